//! Reference constants for the particle step kernel
//!
//! Scaled for a real-time scene where one world unit is roughly one particle
//! spacing and the floor sits just below the origin.

/// Downward acceleration added to the z force component every step
pub const GRAVITY: f32 = 0.02;

/// Height of the floor plane (z axis)
pub const FLOOR_HEIGHT: f32 = -0.1;

/// Penalty spring stiffness of the floor
/// Force is proportional to penetration depth below `FLOOR_HEIGHT`
pub const RESTITUTION_STIFFNESS: f32 = 10.0;

/// Strength of the pairwise inverse-square attraction (implicit unit mass)
pub const ATTRACTION_STRENGTH: f32 = 0.0003;

/// Softening parameter to prevent singularities at r→0
pub const SOFTENING: f32 = 0.1;

/// Default step duration in simulation seconds
pub const TIME_DELTA: f32 = 0.02;

/// Upper bound on `stiffness * dt²` above which the floor spring is likely
/// to gain energy and diverge. Empirical, not enforced.
pub const STABILITY_LIMIT: f32 = 0.1;
