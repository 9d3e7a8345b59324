use crate::foundation::core::{Bounds, FrameRgba8};
use crate::foundation::error::{UndulaError, UndulaResult};
use crate::foundation::math::derive_seed;
use crate::render::cpu::CpuPainter;
use crate::scene::graph::{ParticleGraphConfig, ParticleGraphScene};
use crate::scene::strands::{StrandConfig, StrandScene};
use crate::scene::{Scene, SceneState};
use crate::surface::controller::{ResizeOutcome, SurfaceController};
use crate::surface::viewport::ViewportObserver;
use crate::time::clock::Clock;
use crate::time::scheduler::FrameScheduler;

/// Top-level engine configuration.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed from which all random placement derives.
    pub seed: u64,
    /// Opaque clear color; `None` keeps the surface transparent so the host
    /// page shows through.
    pub clear_rgba: Option<[u8; 4]>,
    /// Glow blur radius in pixels.
    pub glow_radius_px: u32,
    /// Glow blur sigma.
    pub glow_sigma: f32,
    /// Particle graph tunables.
    pub graph: ParticleGraphConfig,
    /// Strand/molecule tunables.
    pub strands: StrandConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            clear_rgba: None,
            glow_radius_px: 8,
            glow_sigma: 3.5,
            graph: ParticleGraphConfig::default(),
            strands: StrandConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> UndulaResult<()> {
        if self.glow_radius_px > 0 && (!self.glow_sigma.is_finite() || self.glow_sigma <= 0.0) {
            return Err(UndulaError::validation("glow sigma must be finite and > 0"));
        }
        self.graph.validate()?;
        self.strands.validate()?;
        Ok(())
    }
}

/// The background animation engine.
///
/// One surface, one scheduler, and the scene list: both visualizations run
/// synchronously inside the same cooperative frame, far layer first. All
/// failure modes degrade to "nothing drawn this frame" — the engine never
/// takes the host page down.
pub struct Engine {
    cfg: EngineConfig,
    clock: Box<dyn Clock>,
    scheduler: FrameScheduler,
    controller: SurfaceController,
    painter: Option<CpuPainter>,
    scenes: Vec<Box<dyn Scene>>,
}

impl Engine {
    /// Create an engine with the standard scene pair (particle graph behind,
    /// strands in front).
    pub fn new(cfg: EngineConfig, clock: Box<dyn Clock>) -> UndulaResult<Self> {
        let scenes: Vec<Box<dyn Scene>> = vec![
            Box::new(ParticleGraphScene::new(cfg.graph)),
            Box::new(StrandScene::new(cfg.strands)),
        ];
        Self::with_scenes(cfg, clock, scenes)
    }

    /// Create an engine with a custom scene list.
    pub fn with_scenes(
        cfg: EngineConfig,
        clock: Box<dyn Clock>,
        scenes: Vec<Box<dyn Scene>>,
    ) -> UndulaResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            clock,
            scheduler: FrameScheduler::new(),
            controller: SurfaceController::new(),
            painter: None,
            scenes,
        })
    }

    /// Bind to a container region and build the surface and populations.
    ///
    /// With zero-area bounds the engine stays pending: frames no-op until a
    /// drawable resize arrives.
    pub fn attach(&mut self, bounds: Bounds) -> UndulaResult<()> {
        self.controller.attach(bounds)?;
        self.reprovision()
    }

    /// Begin firing frames. Idempotent.
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    /// Stop firing frames, effective before the next tick. Idempotent.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Stop, release the surface, and halt every scene.
    pub fn detach(&mut self) {
        self.scheduler.stop();
        self.controller.detach();
        self.painter = None;
        for scene in &mut self.scenes {
            scene.stop();
        }
    }

    /// Apply an observed bounds change.
    ///
    /// Only a width change reinitializes: scene geometry is computed in
    /// absolute pixels from the zone fractions, so it is rebuilt rather than
    /// rescaled. Height-only jitter is ignored.
    pub fn resize(&mut self, bounds: Bounds) -> UndulaResult<ResizeOutcome> {
        let outcome = self.controller.observe(bounds)?;
        if outcome == ResizeOutcome::Reinitialized {
            self.reprovision()?;
        }
        Ok(outcome)
    }

    /// Drain an observer's pending bounds events, applying only the most
    /// recent one. Called between frames, never mid-draw.
    pub fn drain_viewport(&mut self, observer: &mut dyn ViewportObserver) -> UndulaResult<()> {
        let mut latest = None;
        while let Some(bounds) = observer.poll_bounds() {
            latest = Some(bounds);
        }
        if let Some(bounds) = latest {
            self.resize(bounds)?;
        }
        Ok(())
    }

    /// Run one cooperative frame if the scheduler admits it.
    /// Returns whether a frame fired.
    pub fn tick(&mut self) -> UndulaResult<bool> {
        let now = self.clock.now_ms();
        let Some(ts) = self.scheduler.begin_frame(now) else {
            return Ok(false);
        };
        self.frame(ts)?;
        Ok(true)
    }

    /// Whether the scheduler currently fires frames.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Currently observed bounds.
    pub fn bounds(&self) -> Bounds {
        self.controller.bounds()
    }

    /// Lifecycle states of the hosted scenes, in draw order.
    pub fn scene_states(&self) -> Vec<SceneState> {
        self.scenes.iter().map(|s| s.state()).collect()
    }

    /// Copy the current surface contents out.
    pub fn frame_rgba8(&self) -> Option<FrameRgba8> {
        self.controller.frame_rgba8()
    }

    #[tracing::instrument(skip(self), level = "trace")]
    fn frame(&mut self, now_ms: f64) -> UndulaResult<()> {
        let bounds = self.controller.bounds();
        if !self.controller.has_surface() || !bounds.is_drawable() {
            tracing::trace!("no drawable surface, skipping frame");
            return Ok(());
        }

        // Every scene sees the same timestamp; no mixing of stale and fresh
        // state within one frame.
        for scene in &mut self.scenes {
            scene.update(now_ms);
        }

        let Some(painter) = self.painter.as_mut() else {
            return Ok(());
        };
        painter.begin();
        for scene in &self.scenes {
            scene.render(&mut *painter)?;
        }
        let Some(pixmap) = self.controller.pixmap_mut() else {
            return Ok(());
        };
        painter.finish(pixmap, self.cfg.clear_rgba)
    }

    fn reprovision(&mut self) -> UndulaResult<()> {
        let bounds = self.controller.bounds();
        if !self.controller.has_surface() {
            self.painter = None;
            return Ok(());
        }
        self.painter = Some(CpuPainter::new(
            bounds.width,
            bounds.height,
            self.cfg.glow_radius_px,
            self.cfg.glow_sigma,
        )?);
        let (w, h) = (f64::from(bounds.width), f64::from(bounds.height));
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            scene.initialize(w, h, derive_seed(self.cfg.seed, i as u64));
        }
        tracing::debug!(width = bounds.width, height = bounds.height, "scenes initialized");
        Ok(())
    }
}
