//! Fixed-capacity particle storage

use glam::Vec3;
use particle_physics::Particle;

use crate::error::{Result, SimulationError};

/// Contiguous array of particle states, the only mutable resource of a
/// simulation session.
///
/// Capacity is fixed at construction. The store does no locking: the
/// scheduler guarantees each step writes every slot at most once and only
/// after all reads for that step are done.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    particles: Box<[Particle]>,
}

impl ParticleStore {
    /// Store of `capacity` particles at rest at the origin
    pub fn new(capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(SimulationError::ZeroCapacity);
        }
        Ok(Self {
            particles: vec![Particle::ZERO; capacity as usize].into_boxed_slice(),
        })
    }

    /// Store holding exactly `particles`; capacity is their count
    pub fn from_particles(particles: Vec<Particle>) -> Result<Self> {
        if particles.is_empty() {
            return Err(SimulationError::ZeroCapacity);
        }
        Ok(Self {
            particles: particles.into_boxed_slice(),
        })
    }

    pub fn capacity(&self) -> u32 {
        self.particles.len() as u32
    }

    /// Read slot `index`. Panics when `index >= capacity`.
    #[inline]
    pub fn get(&self, index: u32) -> Particle {
        self.particles[index as usize]
    }

    /// Overwrite slot `index`. Panics when `index >= capacity`.
    #[inline]
    pub fn set(&mut self, index: u32, particle: Particle) {
        self.particles[index as usize] = particle;
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Per-instance render offsets
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(Particle::position)
    }

    /// Raw bytes in the WGSL storage-buffer layout
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_zeroed() -> Result<()> {
        let store = ParticleStore::new(4)?;
        assert_eq!(store.capacity(), 4);
        assert!(store.as_slice().iter().all(|p| *p == Particle::ZERO));
        Ok(())
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(ParticleStore::new(0).unwrap_err(), SimulationError::ZeroCapacity);
        assert_eq!(
            ParticleStore::from_particles(Vec::new()).unwrap_err(),
            SimulationError::ZeroCapacity
        );
    }

    #[test]
    fn set_then_get_round_trips() -> Result<()> {
        let mut store = ParticleStore::new(3)?;
        let p = Particle::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        store.set(2, p);
        assert_eq!(store.get(2), p);
        assert_eq!(store.get(0), Particle::ZERO);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn get_out_of_range_panics() {
        let store = ParticleStore::new(2).unwrap();
        store.get(2);
    }

    #[test]
    fn positions_follow_slot_order() -> Result<()> {
        let store = ParticleStore::from_particles(vec![
            Particle::at_rest(Vec3::X),
            Particle::at_rest(Vec3::Y),
            Particle::at_rest(Vec3::Z),
        ])?;
        let positions: Vec<Vec3> = store.positions().collect();
        assert_eq!(positions, vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(store.as_bytes().len(), 3 * 32);
        Ok(())
    }
}
