//! Undula is a procedural background animation engine.
//!
//! It simulates and draws two ambient visualizations — a particle-graph
//! field with a clear central channel, and a multi-strand "molecule" with
//! depth-sorted rendering, feeder streams, and an outward rainbow wave —
//! continuously, at display refresh rate, into a CPU pixel surface.
//!
//! # Per-frame pipeline
//!
//! 1. **Schedule**: [`FrameScheduler`] admits at most one frame per host
//!    tick and stamps it with a monotonic timestamp from the injected
//!    [`Clock`].
//! 2. **Update**: every [`Scene`] advances to that one timestamp.
//! 3. **Render**: scenes record marks through the [`Painter`] boundary,
//!    far layer first.
//! 4. **Resolve**: [`CpuPainter`] rasterizes (crisp pass over a blurred
//!    glow pass) into the surface owned by the engine.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: all random placement flows from an explicit seed;
//!   a frame is a pure function of (population, timestamp), so skipped
//!   frames can never corrupt the simulation.
//! - **Single-threaded cooperative**: the whole update+render pass runs
//!   synchronously inside one frame callback; resizes apply between
//!   frames only.
//! - **Degrade, never crash**: a missing or zero-area surface means
//!   "nothing drawn this frame", not an error for the host page.
//!
//! # Getting started
//!
//! ```no_run
//! use undula::{Bounds, Engine, EngineConfig, SystemClock};
//!
//! let mut engine = Engine::new(EngineConfig::default(), Box::new(SystemClock::new()))?;
//! engine.attach(Bounds::new(1920, 1080))?;
//! engine.start();
//! // Host loop, once per display refresh:
//! engine.tick()?;
//! # Ok::<(), undula::UndulaError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod engine;
mod foundation;
mod render;
mod scene;
mod surface;
mod time;

pub use engine::{Engine, EngineConfig};
pub use foundation::color::{Hsl, Rgba8};
pub use foundation::core::{Bounds, FrameRgba8, Point, Vec2};
pub use foundation::error::{UndulaError, UndulaResult};
pub use foundation::math::Rng64;
pub use render::cpu::CpuPainter;
pub use render::painter::{GradientStop, Painter};
pub use scene::graph::{Particle, ParticleGraphConfig, ParticleGraphScene, zone_alpha};
pub use scene::strands::{LatticeNode, StrandConfig, StrandSample, StrandScene, taper_at};
pub use scene::{Scene, SceneState};
pub use surface::controller::{ResizeOutcome, SurfaceController};
pub use surface::viewport::{QueuedViewport, ViewportObserver};
pub use time::clock::{Clock, ManualClock, SystemClock};
pub use time::scheduler::FrameScheduler;
