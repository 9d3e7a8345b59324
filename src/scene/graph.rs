use kurbo::{Point, Vec2};

use crate::foundation::color::Rgba8;
use crate::foundation::error::{UndulaError, UndulaResult};
use crate::foundation::math::Rng64;
use crate::render::painter::Painter;
use crate::scene::{Scene, SceneState};

/// Tunables for the ambient particle graph.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleGraphConfig {
    /// Fixed population size, set at initialization.
    pub count: usize,
    /// Maximum distance at which two particles are linked, in pixels.
    pub connection_distance: f64,
    /// Half-height of the central clear band, as a fraction of surface
    /// height. Particles inside it are fully transparent.
    pub clear_band_frac: f64,
    /// Distance over which alpha ramps from 0 to its cap, in pixels.
    pub fade_falloff_px: f64,
    /// Alpha cap for particles outside the clear band.
    pub max_alpha: f64,
    /// Velocity component bound, in pixels per millisecond.
    pub max_speed: f64,
    /// Particle dot radius in pixels.
    pub particle_radius: f64,
    /// Multiplier applied to link alpha on top of the endpoint fades.
    pub link_alpha_scale: f64,
}

impl Default for ParticleGraphConfig {
    fn default() -> Self {
        Self {
            count: 130,
            connection_distance: 180.0,
            clear_band_frac: 0.25,
            fade_falloff_px: 100.0,
            max_alpha: 0.6,
            max_speed: 0.02,
            particle_radius: 2.5,
            link_alpha_scale: 0.8,
        }
    }
}

impl ParticleGraphConfig {
    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> UndulaResult<()> {
        if self.count == 0 {
            return Err(UndulaError::validation("particle count must be > 0"));
        }
        if self.connection_distance <= 0.0 {
            return Err(UndulaError::validation("connection distance must be > 0"));
        }
        if !(0.0..=0.5).contains(&self.clear_band_frac) {
            return Err(UndulaError::validation(
                "clear band fraction must be within [0, 0.5]",
            ));
        }
        if self.fade_falloff_px <= 0.0 {
            return Err(UndulaError::validation("fade falloff must be > 0"));
        }
        Ok(())
    }
}

/// A point mass in the ambient field.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Current position.
    pub pos: Point,
    /// Velocity in pixels per millisecond.
    pub vel: Vec2,
}

/// Alpha for a point at vertical position `y`: zero inside the central clear
/// band, then a linear ramp over the falloff distance, capped.
pub fn zone_alpha(y: f64, height: f64, cfg: &ParticleGraphConfig) -> f64 {
    let dist = (y - height / 2.0).abs();
    let band = height * cfg.clear_band_frac;
    if dist <= band {
        0.0
    } else {
        ((dist - band) / cfg.fade_falloff_px).min(cfg.max_alpha)
    }
}

/// Integrate one particle over `dt_ms`, reflecting velocity at the walls.
///
/// The bounce is elastic, not a clamp; the position correction after
/// reflection only keeps the particle from sitting outside the wall while
/// its velocity already points back in.
fn integrate(p: &mut Particle, dt_ms: f64, width: f64, height: f64) {
    p.pos.x += p.vel.x * dt_ms;
    p.pos.y += p.vel.y * dt_ms;
    if p.pos.x < 0.0 || p.pos.x > width {
        p.vel.x = -p.vel.x;
        p.pos.x = p.pos.x.clamp(0.0, width);
    }
    if p.pos.y < 0.0 || p.pos.y > height {
        p.vel.y = -p.vel.y;
        p.pos.y = p.pos.y.clamp(0.0, height);
    }
}

/// Ambient node field with distance-based links and a clear central channel.
///
/// Link drawing is an O(n²) pairwise pass by design; the population is small
/// and fixed at initialization.
pub struct ParticleGraphScene {
    cfg: ParticleGraphConfig,
    state: SceneState,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    last_ms: Option<f64>,
}

/// Alpha below which a particle is skipped entirely.
const DRAW_EPSILON: f64 = 0.01;

impl ParticleGraphScene {
    /// Create an uninitialized scene.
    pub fn new(cfg: ParticleGraphConfig) -> Self {
        Self {
            cfg,
            state: SceneState::Uninitialized,
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
            last_ms: None,
        }
    }

    /// Current population.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ParticleGraphConfig {
        &self.cfg
    }
}

impl Scene for ParticleGraphScene {
    fn state(&self) -> SceneState {
        self.state
    }

    fn initialize(&mut self, width: f64, height: f64, seed: u64) {
        let mut rng = Rng64::new(seed);
        self.width = width;
        self.height = height;
        self.particles = (0..self.cfg.count)
            .map(|_| Particle {
                pos: Point::new(
                    rng.next_f64_in(0.0, width),
                    rng.next_f64_in(0.0, height),
                ),
                vel: Vec2::new(
                    rng.next_f64_in(-self.cfg.max_speed, self.cfg.max_speed),
                    rng.next_f64_in(-self.cfg.max_speed, self.cfg.max_speed),
                ),
            })
            .collect();
        self.last_ms = None;
        self.state = SceneState::Running;
    }

    fn update(&mut self, now_ms: f64) {
        if self.state != SceneState::Running {
            return;
        }
        let dt = self.last_ms.map_or(0.0, |prev| (now_ms - prev).max(0.0));
        self.last_ms = Some(now_ms);
        for p in &mut self.particles {
            integrate(p, dt, self.width, self.height);
        }
    }

    fn render(&self, painter: &mut dyn Painter) -> UndulaResult<()> {
        if self.state != SceneState::Running {
            return Ok(());
        }

        // Links first so dots sit on top of them.
        for (i, a) in self.particles.iter().enumerate() {
            let alpha_a = zone_alpha(a.pos.y, self.height, &self.cfg);
            if alpha_a <= DRAW_EPSILON {
                continue;
            }
            for b in &self.particles[i + 1..] {
                let alpha_b = zone_alpha(b.pos.y, self.height, &self.cfg);
                if alpha_b <= DRAW_EPSILON {
                    continue;
                }
                let dist = a.pos.distance(b.pos);
                if dist >= self.cfg.connection_distance {
                    continue;
                }
                let fade = 1.0 - dist / self.cfg.connection_distance;
                let alpha = alpha_a.min(alpha_b) * fade * self.cfg.link_alpha_scale;
                painter.stroke_line(a.pos, b.pos, 1.0, Rgba8::WHITE.scale_alpha(alpha));
            }
        }

        for p in &self.particles {
            let alpha = zone_alpha(p.pos.y, self.height, &self.cfg);
            if alpha <= DRAW_EPSILON {
                continue;
            }
            painter.fill_circle(
                p.pos,
                self.cfg.particle_radius,
                Rgba8::WHITE.scale_alpha(alpha),
                None,
            );
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.state = SceneState::Stopped;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
