use std::f64::consts::{PI, TAU};

use kurbo::{CubicBez, ParamCurve, Point};

use crate::foundation::color::{Hsl, Rgba8};
use crate::foundation::error::{UndulaError, UndulaResult};
use crate::foundation::math::{Rng64, lerp};
use crate::render::painter::{GradientStop, Painter};
use crate::scene::{Scene, SceneState};

/// Per-strand angular offsets: two backbone strands opposed at 0/π, two rung
/// strands at π/2 and 3π/2.
const STRAND_OFFSETS: [f64; 4] = [0.0, PI, PI * 0.5, PI * 1.5];

/// Taper below which a sample is fully dissolved and not emitted.
const TAPER_EPSILON: f64 = 0.005;

const CYAN: Rgba8 = Rgba8::new(6, 182, 212, 255);
const NODE_FILL: Rgba8 = Rgba8::new(5, 5, 5, 255);
const BACKBONE_LINK: Rgba8 = Rgba8::new(203, 213, 225, 255);
const RUNG_LINK: Rgba8 = Rgba8::new(148, 163, 184, 255);

/// Tunables for the strand/molecule visualization.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StrandConfig {
    /// Lattice population size.
    pub node_count: usize,
    /// Lattice horizontal region as width fractions.
    pub lattice_x: (f64, f64),
    /// Lattice vertical region as height fractions.
    pub lattice_y: (f64, f64),
    /// Maximum distance at which two lattice nodes are linked, in pixels.
    pub node_link_distance: f64,
    /// Helix horizontal zone as width fractions.
    pub helix_zone: (f64, f64),
    /// Centerline height as a fraction of surface height.
    pub center_y_frac: f64,
    /// Helix sample steps across the zone.
    pub steps: u32,
    /// Base strand radius in pixels, before `molecule_scale`.
    pub strand_radius: f64,
    /// Global scale applied to the strand radius.
    pub molecule_scale: f64,
    /// Spatial twist frequency, radians per pixel.
    pub helix_freq: f64,
    /// Angular speed at the zone start; it grows by 1 rad/s across the zone.
    pub base_spin: f64,
    /// Tip oscillation frequency.
    pub tip_freq: f64,
    /// Tip oscillation amplitude in pixels; also the output wave amplitude.
    pub tip_amp: f64,
    /// Base hue of the backbone strand pair, degrees.
    pub base_hue_a: f64,
    /// Base hue of the rung strand pair, degrees.
    pub base_hue_b: f64,
    /// Output wave sampling interval in pixels.
    pub wave_step_px: f64,
    /// Output wave stroke width in pixels.
    pub wave_width: f64,
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            node_count: 25,
            lattice_x: (0.05, 0.22),
            lattice_y: (0.35, 0.85),
            node_link_distance: 120.0,
            helix_zone: (0.30, 0.70),
            center_y_frac: 0.58,
            steps: 80,
            strand_radius: 70.0,
            molecule_scale: 1.3,
            helix_freq: 0.02,
            base_spin: 0.3,
            tip_freq: 0.08,
            tip_amp: 40.0,
            base_hue_a: 180.0,
            base_hue_b: 210.0,
            wave_step_px: 3.0,
            wave_width: 4.0,
        }
    }
}

impl StrandConfig {
    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> UndulaResult<()> {
        if self.node_count == 0 {
            return Err(UndulaError::validation("lattice node count must be > 0"));
        }
        if self.steps == 0 {
            return Err(UndulaError::validation("helix steps must be > 0"));
        }
        for (name, (lo, hi)) in [
            ("lattice_x", self.lattice_x),
            ("lattice_y", self.lattice_y),
            ("helix_zone", self.helix_zone),
        ] {
            if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
                return Err(UndulaError::validation(format!(
                    "{name} must be an ordered fraction pair within [0, 1]"
                )));
            }
        }
        if self.strand_radius <= 0.0 || self.molecule_scale <= 0.0 {
            return Err(UndulaError::validation("strand radius and scale must be > 0"));
        }
        if self.wave_step_px <= 0.0 {
            return Err(UndulaError::validation("wave step must be > 0"));
        }
        Ok(())
    }
}

/// A source node in the floating lattice.
///
/// Structurally immutable after creation: only `pos` moves, oscillating
/// around `base`.
#[derive(Clone, Copy, Debug)]
pub struct LatticeNode {
    /// Stable index within the population.
    pub id: u32,
    /// Anchor the node drifts around.
    pub base: Point,
    /// Position at the current frame timestamp.
    pub pos: Point,
    /// Oscillation phase offset.
    pub phase: f64,
    /// Which of the four strands this node's feeder stream targets.
    pub target_strand: usize,
}

/// One closed-form helix sample. Recomputed every frame, never persisted.
#[derive(Clone, Copy, Debug)]
pub struct StrandSample {
    /// Screen x.
    pub x: f64,
    /// Screen y.
    pub y: f64,
    /// Synthetic depth in `[-1, 1]`; the sole occlusion mechanism.
    pub depth: f64,
    /// Dissolve factor in `[0, 1]`.
    pub taper: f64,
}

/// Ephemeral depth-sortable render primitive.
#[derive(Clone, Copy, Debug)]
struct Atom {
    pos: Point,
    depth: f64,
    radius: f64,
    alpha: f64,
    color: Rgba8,
    glow: Option<Rgba8>,
}

/// Taper factor at `progress` along the helix zone: solid until 0.4, then a
/// cosine ease-out to zero so strands dissolve instead of hard-cutting.
pub fn taper_at(progress: f64) -> f64 {
    if progress <= 0.4 {
        1.0
    } else {
        let t = ((progress - 0.4) / 0.6).min(1.0);
        ((t * PI).cos() + 1.0) / 2.0
    }
}

/// Feeder highlight cycle: one traveling particle per node, active during
/// the first 1 of every 4 time-units, staggered by the node phase.
pub(crate) fn feeder_highlight_progress(time_s: f64, rate: f64, phase: f64) -> Option<f64> {
    let cycle = (time_s * rate + phase).rem_euclid(4.0);
    (cycle < 1.0).then_some(cycle)
}

/// Lattice source nodes, a four-strand helix with tapering and depth,
/// feeder streams from lattice to helix, and an outward procedural wave.
pub struct StrandScene {
    cfg: StrandConfig,
    state: SceneState,
    width: f64,
    height: f64,
    nodes: Vec<LatticeNode>,
    time_s: f64,
}

impl StrandScene {
    /// Create an uninitialized scene.
    pub fn new(cfg: StrandConfig) -> Self {
        Self {
            cfg,
            state: SceneState::Uninitialized,
            width: 0.0,
            height: 0.0,
            nodes: Vec::new(),
            time_s: 0.0,
        }
    }

    /// Current lattice population.
    pub fn nodes(&self) -> &[LatticeNode] {
        &self.nodes
    }

    /// Configuration in effect.
    pub fn config(&self) -> &StrandConfig {
        &self.cfg
    }

    /// Sample strand `strand` (0..4) at screen position `x` for the current
    /// frame timestamp.
    pub fn sample(&self, x: f64, strand: usize) -> StrandSample {
        self.sample_at(x, STRAND_OFFSETS[strand % STRAND_OFFSETS.len()])
    }

    fn sample_at(&self, x: f64, angle_offset: f64) -> StrandSample {
        let cfg = &self.cfg;
        let start = cfg.helix_zone.0 * self.width;
        let span = (cfg.helix_zone.1 - cfg.helix_zone.0) * self.width;
        let progress = ((x - start) / span).max(0.0);
        let taper = taper_at(progress);
        let t = self.time_s;

        // Whip-tip motion: the global oscillation concentrates at the outer
        // end, the residual float at the inner end.
        let shift = progress.powf(2.5);
        let tip = (-t * cfg.tip_freq * 10.0).sin() * cfg.tip_amp;
        let center = self.height * cfg.center_y_frac + tip * shift;
        let float_y = (t * 0.8 + x * 0.01).sin() * 15.0 * (1.0 - shift);

        // The twist accelerates with progress, both in time and space.
        let spin = cfg.base_spin + progress;
        let twist = progress * progress * 2.0;
        let angle = x * cfg.helix_freq - t * spin + twist + angle_offset;

        let radius = cfg.strand_radius * cfg.molecule_scale;
        StrandSample {
            x,
            y: center + angle.sin() * radius * taper + float_y,
            depth: angle.cos() * taper,
            taper,
        }
    }

    /// All molecule atoms for the current timestamp, sorted by depth
    /// ascending (far to near).
    fn molecule_atoms(&self) -> Vec<Atom> {
        let cfg = &self.cfg;
        let start = cfg.helix_zone.0 * self.width;
        let end = cfg.helix_zone.1 * self.width;
        let span = end - start;
        let step_size = span / f64::from(cfg.steps);
        let t = self.time_s;

        let mut atoms = Vec::new();
        for i in 0..=cfg.steps {
            let x = start + f64::from(i) * step_size;
            let s = STRAND_OFFSETS.map(|off| self.sample_at(x, off));
            if s[0].taper <= TAPER_EPSILON {
                continue;
            }

            let atom_scale = 0.3 + 0.7 * s[0].taper;
            let progress = (x - start) / span;
            let mix = ((progress - 0.7) / 0.3).max(0.0);
            let rainbow = 360.0 - (t * 20.0 + x * 0.1).rem_euclid(360.0);
            let hue_a = lerp(cfg.base_hue_a, rainbow, mix);
            let hue_b = lerp(cfg.base_hue_b, rainbow, mix);
            let lightness = 0.9 - mix * 0.2;

            for (k, sample) in s.iter().enumerate() {
                let hue = if k % 2 == 0 { hue_a } else { hue_b };
                atoms.push(Atom {
                    pos: Point::new(sample.x, sample.y),
                    depth: sample.depth,
                    radius: 4.0 * atom_scale,
                    alpha: 1.0,
                    color: Hsl::new(hue, 1.0, lightness).to_rgba8(1.0),
                    glow: (mix > 0.5).then(|| Hsl::new(hue, 1.0, 0.6).to_rgba8(1.0)),
                });
            }

            push_connector(&mut atoms, s[0], s[1], atom_scale, BACKBONE_LINK);
            push_connector(&mut atoms, s[2], s[3], atom_scale, RUNG_LINK);
        }

        atoms.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        atoms
    }

    /// Outward-traveling phase `k·x − ω·t`, with ω growing with distance so
    /// the wave speeds up away from the helix. Crests must move away from
    /// the helix, never toward it.
    fn wave_phase(&self, dist: f64, total: f64) -> f64 {
        let ratio = dist / total;
        let accel = ratio * 0.8;
        -self.time_s * (self.cfg.tip_freq + accel) * 10.0 + dist * 0.008
    }

    fn render_lattice(&self, painter: &mut dyn Painter) {
        let cfg = &self.cfg;
        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                let dist = a.pos.distance(b.pos);
                if dist >= cfg.node_link_distance {
                    continue;
                }
                let alpha = (1.0 - dist / cfg.node_link_distance) * 0.3;
                painter.stroke_line(a.pos, b.pos, 1.0, CYAN.scale_alpha(alpha));
            }
        }
        for node in &self.nodes {
            painter.fill_circle(node.pos, 3.5, NODE_FILL, None);
            painter.stroke_circle(node.pos, 3.5, 1.5, CYAN, Some(CYAN.scale_alpha(0.5)));
        }
    }

    fn render_molecule(&self, painter: &mut dyn Painter) {
        for atom in self.molecule_atoms() {
            let depth_scale = 0.6 + 0.6 * (atom.depth + 1.0) / 2.0;
            let radius = atom.radius * depth_scale;
            let alpha = (atom.alpha * depth_scale).min(1.0);
            painter.fill_circle(
                atom.pos,
                radius,
                atom.color.scale_alpha(alpha),
                atom.glow,
            );
        }
    }

    fn render_feeders(&self, painter: &mut dyn Painter) {
        let cfg = &self.cfg;
        let start_x = cfg.helix_zone.0 * self.width;
        let targets = STRAND_OFFSETS.map(|off| self.sample_at(start_x, off));

        for node in &self.nodes {
            // Streams flow out of the node's right side.
            let sx = node.pos.x + 4.0;
            let target = targets[node.target_strand % targets.len()];
            let curve = CubicBez::new(
                Point::new(sx, node.pos.y),
                Point::new(sx + (start_x - sx) * 0.5, node.pos.y),
                Point::new(start_x - (start_x - sx) * 0.2, target.y),
                Point::new(target.x, target.y),
            );

            let stops = [
                GradientStop::new(0.0, CYAN.scale_alpha(0.0)),
                GradientStop::new(0.3, CYAN.scale_alpha(0.1)),
                GradientStop::new(1.0, CYAN.scale_alpha(0.4)),
            ];
            painter.stroke_cubic(curve, 1.0, &stops);

            let rate = 1.0 + f64::from(node.id % 3) * 0.3;
            if let Some(progress) = feeder_highlight_progress(self.time_s, rate, node.phase) {
                let p = curve.eval(progress);
                painter.fill_circle(p, 2.0, Rgba8::WHITE.scale_alpha(0.9), Some(Rgba8::WHITE));
            }
        }
    }

    fn render_wave(&self, painter: &mut dyn Painter) {
        let cfg = &self.cfg;
        let start = cfg.helix_zone.1 * self.width;
        let end = self.width;
        let total = end - start;
        if total <= cfg.wave_step_px {
            return;
        }
        let center = self.height * cfg.center_y_frac;

        let mut points = Vec::with_capacity((total / cfg.wave_step_px) as usize + 1);
        let mut x = start;
        while x < end {
            let dist = x - start;
            let ratio = dist / total;
            let phase = self.wave_phase(dist, total);
            let amplitude = cfg.tip_amp * (1.0 + ratio * 0.2);
            let base = phase.sin() * amplitude;
            // Secondary detail fades in over the first quarter of the run.
            let envelope = (ratio * 4.0).min(1.0);
            let noise = (phase * 2.0 + dist * 0.05).sin() * amplitude * 0.25 * envelope;
            points.push(Point::new(x, center + base + noise));
            x += cfg.wave_step_px;
        }

        let hue = 360.0 - (self.time_s * 20.0).rem_euclid(360.0);
        let stops = [
            GradientStop::new(0.0, Hsl::new(hue, 1.0, 0.7).to_rgba8(1.0)),
            GradientStop::new(0.5, Hsl::new(hue - 90.0, 1.0, 0.6).to_rgba8(1.0)),
            GradientStop::new(1.0, Hsl::new(hue - 180.0, 1.0, 0.5).to_rgba8(0.0)),
        ];
        let glow = Hsl::new(hue, 0.8, 0.6).to_rgba8(0.8);
        painter.stroke_polyline(&points, cfg.wave_width, &stops, Some(glow));
    }
}

fn push_connector(
    atoms: &mut Vec<Atom>,
    a: StrandSample,
    b: StrandSample,
    atom_scale: f64,
    color: Rgba8,
) {
    let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
    if dist <= 3.0 * atom_scale {
        return;
    }
    let count = (dist / (15.0 * atom_scale)).floor() as usize;
    for k in 1..count {
        let t = k as f64 / count as f64;
        atoms.push(Atom {
            pos: Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t)),
            depth: lerp(a.depth, b.depth, t),
            radius: 1.5 * atom_scale,
            alpha: 0.8,
            color,
            glow: None,
        });
    }
}

impl Scene for StrandScene {
    fn state(&self) -> SceneState {
        self.state
    }

    fn initialize(&mut self, width: f64, height: f64, seed: u64) {
        let cfg = self.cfg;
        let mut rng = Rng64::new(seed);
        self.width = width;
        self.height = height;
        self.nodes = (0..cfg.node_count)
            .map(|i| {
                let x = rng.next_f64_in(cfg.lattice_x.0 * width, cfg.lattice_x.1 * width);
                let y = rng.next_f64_in(cfg.lattice_y.0 * height, cfg.lattice_y.1 * height);
                LatticeNode {
                    id: i as u32,
                    base: Point::new(x, y),
                    pos: Point::new(x, y),
                    phase: rng.next_f64_in(0.0, TAU),
                    target_strand: (rng.next_u64() % 4) as usize,
                }
            })
            .collect();
        self.time_s = 0.0;
        self.state = SceneState::Running;
    }

    fn update(&mut self, now_ms: f64) {
        if self.state != SceneState::Running {
            return;
        }
        let t = now_ms * 0.001;
        self.time_s = t;
        // Nodes drift around their anchors; they never translate.
        for node in &mut self.nodes {
            node.pos = Point::new(
                node.base.x + (t * 0.25 + node.phase).sin() * 15.0,
                node.base.y + (t * 0.15 + node.phase).cos() * 15.0,
            );
        }
    }

    fn render(&self, painter: &mut dyn Painter) -> UndulaResult<()> {
        if self.state != SceneState::Running || self.width <= 0.0 || self.height <= 0.0 {
            return Ok(());
        }
        self.render_lattice(painter);
        self.render_molecule(painter);
        self.render_feeders(painter);
        self.render_wave(painter);
        Ok(())
    }

    fn stop(&mut self) {
        self.state = SceneState::Stopped;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/strands.rs"]
mod tests;
