//! # Skyburst
//!
//! An animated fireworks display: a continuous stream of short-lived
//! particle bursts simulated on the CPU and rendered as additive point
//! sprites with wgpu.
//!
//! ## Quick Start
//!
//! ```ignore
//! use skyburst::{BurstDesign, Display, DisplayParams};
//!
//! fn main() -> Result<(), skyburst::DisplayError> {
//!     Display::new()
//!         .with_params(DisplayParams {
//!             design: BurstDesign::Spiral,
//!             ..DisplayParams::default()
//!         })
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Bursts
//!
//! A burst is one firework: a fixed-size set of parallel attribute arrays
//! ([`ParticleBuffers`]) holding position, velocity, color, and remaining
//! lifetime per particle. [`burst::generate`] builds the arrays from a
//! spawn origin and the current [`DisplayParams`], using one of two
//! designs ([`BurstDesign::Explosion`] or [`BurstDesign::Spiral`]).
//!
//! ### Lifecycle
//!
//! The [`BurstRegistry`] owns every active burst, refuses spawns past
//! [`registry::MAX_BURSTS`], and retires each burst a fixed
//! [`registry::BURST_LIFETIME`] after creation. Individual particles carry
//! jittered lifetimes and are parked off-screen by the integrator when they
//! expire - buffers never resize mid-flight.
//!
//! ### Frame loop
//!
//! Each frame, [`integrator::step`] advances every active burst (Euler
//! position update, gravity, horizontal damping, lifetime decay), after
//! which the renderer re-uploads any buffers marked dirty. Color edits in
//! the parameter panel re-randomize every particle's gradient sample via
//! [`ParticleBuffers::remap_colors`], independent of the physics state.

pub mod burst;
mod display;
mod error;
mod gpu;
pub mod integrator;
pub mod params;
#[cfg(feature = "egui")]
mod panel;
pub mod registry;
pub mod spawn;
pub mod time;
pub mod visuals;

mod shader;

pub use burst::{Burst, BurstId, ParticleBuffers};
pub use display::Display;
pub use error::{DisplayError, GpuError};
pub use glam::Vec3;
pub use params::{BurstDesign, DisplayParams};
pub use registry::{BurstRegistry, SpawnTimer};
pub use spawn::SpawnContext;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use skyburst::prelude::*;
/// ```
pub mod prelude {
    pub use crate::burst::{Burst, BurstId, ParticleBuffers};
    pub use crate::display::Display;
    pub use crate::error::{DisplayError, GpuError};
    pub use crate::params::{BurstDesign, DisplayParams};
    pub use crate::registry::{BurstRegistry, SpawnTimer};
    pub use crate::spawn::SpawnContext;
    pub use crate::time::Time;
    pub use crate::Vec3;
}
