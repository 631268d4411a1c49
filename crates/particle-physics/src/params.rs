//! Physics parameters for runtime tuning

use crate::constants::*;

/// Named constants read by the force model.
///
/// All invocations of one step observe the same values; the set may be
/// swapped wholesale between steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    /// Magnitude subtracted from the z force component
    pub gravity: f32,
    /// Floor plane height (z)
    pub floor_height: f32,
    /// Floor penalty spring stiffness
    pub restitution_stiffness: f32,
    /// Pairwise attraction strength
    pub attraction_strength: f32,
    /// Added to every pair distance before division
    pub softening: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            floor_height: FLOOR_HEIGHT,
            restitution_stiffness: RESTITUTION_STIFFNESS,
            attraction_strength: ATTRACTION_STRENGTH,
            softening: SOFTENING,
        }
    }
}

impl PhysicsParams {
    /// `stiffness * dt²`, the quantity that must stay small for the floor
    /// spring to remain stable under the semi-implicit integrator.
    pub fn spring_stability(&self, time_delta: f32) -> f32 {
        self.restitution_stiffness * time_delta * time_delta
    }

    /// Whether `time_delta` stays under [`STABILITY_LIMIT`] for these params
    pub fn is_stable_for(&self, time_delta: f32) -> bool {
        self.spring_stability(time_delta) <= STABILITY_LIMIT
    }
}
