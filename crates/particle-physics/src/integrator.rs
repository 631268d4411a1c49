//! Semi-implicit Euler integration

use glam::Vec3;

use crate::particle::Particle;

/// Advance one particle by `dt` under `force` (unit mass).
///
/// Position moves with the velocity from *before* this step's force is
/// applied:
///
/// ```text
/// position' = position + velocity * dt
/// velocity' = velocity + force * dt
/// ```
///
/// Swapping the two updates changes bounce trajectories.
#[inline]
pub fn integrate(particle: &Particle, force: Vec3, dt: f32) -> Particle {
    let velocity = particle.velocity();
    let position = particle.position() + velocity * dt;
    Particle::new(position, velocity + force * dt)
}
