//! # Particle Simulation Engine
//!
//! Data-parallel particle stepping on the CPU: a fixed-capacity store, a
//! per-step configuration, and a scheduler that fans one kernel invocation
//! out per particle with an explicit read/write barrier.

pub mod dispatch;
pub mod error;
pub mod kernel;
pub mod params;
pub mod simulation;
pub mod store;

pub use dispatch::*;
pub use error::*;
pub use kernel::*;
pub use params::*;
pub use simulation::*;
pub use store::*;
