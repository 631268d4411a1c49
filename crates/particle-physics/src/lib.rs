//! # Particle Physics
//!
//! Pure numeric core of the particle step: particle layout, reference
//! constants, composable force terms and the semi-implicit Euler integrator.
//! Nothing here owns state or knows about dispatch.

pub mod constants;
pub mod forces;
pub mod integrator;
pub mod params;
pub mod particle;

pub use constants::*;
pub use forces::*;
pub use integrator::*;
pub use params::*;
pub use particle::*;
