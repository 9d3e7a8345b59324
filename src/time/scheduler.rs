/// Gate and timestamp authority for the cooperative render loop.
///
/// The host pumps the loop (vsync, timer, or a plain `for` over synthetic
/// time); the scheduler decides whether a frame fires and what timestamp it
/// sees. Invariants:
///
/// - at most one in-flight frame (enforced by `&mut self`; frames run to
///   completion synchronously),
/// - no frame after [`stop`](Self::stop), even for a tick that was already
///   queued by the host,
/// - timestamps handed to frames never decrease, across stop/start cycles
///   included,
/// - no catch-up: ticks that never arrive are simply lost.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    running: bool,
    last_ms: Option<f64>,
}

impl FrameScheduler {
    /// Create a stopped scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin firing frames. Idempotent.
    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!("frame scheduler started");
        }
        self.running = true;
    }

    /// Stop firing frames, effective immediately. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("frame scheduler stopped");
        }
        self.running = false;
    }

    /// Whether frames currently fire.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Admit one frame at the sampled time, returning the clamped timestamp
    /// to hand to scene models, or `None` when stopped.
    ///
    /// Non-finite samples reuse the previous stamp rather than poisoning the
    /// simulation.
    pub fn begin_frame(&mut self, now_ms: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let prev = self.last_ms.unwrap_or(0.0);
        let ts = if now_ms.is_finite() {
            now_ms.max(prev)
        } else {
            prev
        };
        self.last_ms = Some(ts);
        Some(ts)
    }

    /// Invoke `f` with the frame timestamp if a frame is admitted.
    /// Returns whether `f` ran.
    pub fn tick_with(&mut self, now_ms: f64, f: impl FnOnce(f64)) -> bool {
        match self.begin_frame(now_ms) {
            Some(ts) => {
                f(ts);
                true
            }
            None => false,
        }
    }
}
