//! Per-invocation kernel entry points
//!
//! Each function is what a single invocation of a dispatch runs. Both start
//! with the same range guard: invocations past the particle count return
//! `None` without touching the store, which is what makes dispatches wider
//! than the particle count safe.

use particle_physics::{integrate, Particle};

use crate::params::SimulationConfig;

/// Init pass. Seeding hook that currently keeps every slot as it is.
#[inline]
pub fn init_particle(
    invocation: u32,
    particle_count: u32,
    particles: &[Particle],
) -> Option<Particle> {
    if invocation >= particle_count {
        return None;
    }
    Some(particles[invocation as usize])
}

/// Update pass: accumulate forces against the step's read snapshot and
/// integrate the invocation's own particle.
///
/// `particles` is the whole store as it was before the step; only its first
/// `config.active_count` slots are read.
#[inline]
pub fn update_particle(
    invocation: u32,
    particles: &[Particle],
    config: &SimulationConfig,
) -> Option<Particle> {
    if invocation >= config.active_count {
        return None;
    }
    let index = invocation as usize;
    let active = &particles[..config.active_count as usize];
    let force = config.force_model.compute_force(index, active, &config.physics);
    Some(integrate(&active[index], force, config.time_delta))
}
