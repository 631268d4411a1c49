//! Force terms and their composition into a per-particle force model
//!
//! Every term is a pure function of a read-only particle snapshot. Mass is
//! implicitly 1, so the accumulated force is used directly as acceleration.

use glam::Vec3;

use crate::params::PhysicsParams;
use crate::particle::Particle;

/// One additive contribution to a particle's force.
///
/// Declaration order is evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForceTerm {
    /// Penalty spring pushing up particles that sank below the floor
    FloorCollision,
    /// Softened inverse-square attraction towards every other active particle
    PairwiseAttraction,
    /// Constant downward pull along -z
    UniformGravity,
}

impl ForceTerm {
    /// Contribution of this term to the force on `particles[index]`
    pub fn evaluate(self, index: usize, particles: &[Particle], params: &PhysicsParams) -> Vec3 {
        match self {
            ForceTerm::FloorCollision => {
                floor_collision_force(particles[index].position(), params)
            }
            ForceTerm::PairwiseAttraction => pairwise_attraction_force(index, particles, params),
            ForceTerm::UniformGravity => uniform_gravity_force(params),
        }
    }
}

/// Floor penalty spring
/// F.z = k * (floor - z) when z < floor, zero otherwise
///
/// Only ever pushes upward and keeps no contact state between steps.
pub fn floor_collision_force(position: Vec3, params: &PhysicsParams) -> Vec3 {
    if position.z < params.floor_height {
        let deflection = params.floor_height - position.z;
        Vec3::new(0.0, 0.0, params.restitution_stiffness * deflection)
    } else {
        Vec3::ZERO
    }
}

/// Softened attraction of `source` on a particle at `target`
/// d = |r| + softening, F = (r / d) * strength / d²
pub fn attraction_towards(target: Vec3, source: Vec3, params: &PhysicsParams) -> Vec3 {
    let delta = source - target;
    let distance = delta.length() + params.softening;
    let direction = delta / distance;
    direction * params.attraction_strength / (distance * distance)
}

/// Sum of the attraction from every particle in `particles` except `index`.
///
/// `particles` must be exactly the active prefix of the store; O(n) per call.
pub fn pairwise_attraction_force(
    index: usize,
    particles: &[Particle],
    params: &PhysicsParams,
) -> Vec3 {
    let target = particles[index].position();
    particles
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .fold(Vec3::ZERO, |acc, (_, other)| {
            acc + attraction_towards(target, other.position(), params)
        })
}

/// Uniform gravity along -z
pub fn uniform_gravity_force(params: &PhysicsParams) -> Vec3 {
    Vec3::new(0.0, 0.0, -params.gravity)
}

/// Set of enabled force terms, always evaluated floor, attraction, gravity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForceModel {
    // Sorted by `ForceTerm` order, no duplicates
    terms: Vec<ForceTerm>,
}

impl Default for ForceModel {
    fn default() -> Self {
        Self::n_body()
    }
}

impl ForceModel {
    /// Enable `terms`. Order and repeats in the input are ignored.
    pub fn new(mut terms: Vec<ForceTerm>) -> Self {
        terms.sort_unstable();
        terms.dedup();
        Self { terms }
    }

    /// Gravity alone. Equivalent to decrementing velocity.z by `gravity * dt`.
    pub fn gravity_only() -> Self {
        Self::new(vec![ForceTerm::UniformGravity])
    }

    /// Floor bounce under gravity
    pub fn floor_bounce() -> Self {
        Self::new(vec![ForceTerm::FloorCollision, ForceTerm::UniformGravity])
    }

    /// Floor bounce, all-pairs attraction and gravity
    pub fn n_body() -> Self {
        Self::new(vec![
            ForceTerm::FloorCollision,
            ForceTerm::PairwiseAttraction,
            ForceTerm::UniformGravity,
        ])
    }

    pub fn terms(&self) -> &[ForceTerm] {
        &self.terms
    }

    pub fn contains(&self, term: ForceTerm) -> bool {
        self.terms.contains(&term)
    }

    /// Enable `term` at its fixed place in the evaluation order
    pub fn with_term(mut self, term: ForceTerm) -> Self {
        if let Err(at) = self.terms.binary_search(&term) {
            self.terms.insert(at, term);
        }
        self
    }

    /// Disable `term`
    pub fn without_term(mut self, term: ForceTerm) -> Self {
        self.terms.retain(|t| *t != term);
        self
    }

    /// Total force on `particles[index]`, summed in term order.
    ///
    /// `particles` is the read snapshot of the active particles for this step.
    pub fn compute_force(
        &self,
        index: usize,
        particles: &[Particle],
        params: &PhysicsParams,
    ) -> Vec3 {
        self.terms.iter().fold(Vec3::ZERO, |force, term| {
            force + term.evaluate(index, particles, params)
        })
    }
}
