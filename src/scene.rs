pub mod graph;
pub mod strands;

use crate::foundation::error::UndulaResult;
use crate::render::painter::Painter;

/// Lifecycle of a scene model.
///
/// Reinitialization is always a full population replacement, never an
/// in-place patch, so frame computation stays a pure function of
/// (state, timestamp).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SceneState {
    /// No population yet; updates and renders are no-ops.
    #[default]
    Uninitialized,
    /// Simulating and drawing.
    Running,
    /// Halted; stays inert until reinitialized.
    Stopped,
}

/// A self-contained simulation layer drawn once per frame.
///
/// Both visualizations execute inside the same cooperative frame callback,
/// but each scene owns its arrays exclusively — nothing mutable crosses
/// scene boundaries.
pub trait Scene {
    /// Current lifecycle state.
    fn state(&self) -> SceneState;

    /// Replace the whole population for a surface of the given pixel size.
    fn initialize(&mut self, width: f64, height: f64, seed: u64);

    /// Advance simulation state to the frame timestamp, in milliseconds.
    /// Every quantity drawn afterwards derives from this one timestamp.
    fn update(&mut self, now_ms: f64);

    /// Draw the current state. Must not mutate simulation state.
    fn render(&self, painter: &mut dyn Painter) -> UndulaResult<()>;

    /// Halt the scene; subsequent updates are no-ops until reinitialized.
    fn stop(&mut self);
}
