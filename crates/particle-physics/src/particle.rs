//! Particle state shared by the CPU kernel and GPU buffers

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// GPU-compatible particle structure
/// Aligned for WGSL struct compatibility (`vec3<f32>` occupies 16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position in world space
    pub position: [f32; 3],
    _padding0: f32,

    /// Velocity in world space
    pub velocity: [f32; 3],
    _padding1: f32,
}

impl Particle {
    /// Particle at rest at the origin
    pub const ZERO: Self = Self {
        position: [0.0; 3],
        _padding0: 0.0,
        velocity: [0.0; 3],
        _padding1: 0.0,
    };

    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position: position.to_array(),
            velocity: velocity.to_array(),
            ..Self::ZERO
        }
    }

    /// Create a particle at rest
    pub fn at_rest(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        Vec3::from_array(self.velocity)
    }

    /// True when no position or velocity component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.position().is_finite() && self.velocity().is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<Particle>(), 32);
        assert_eq!(std::mem::offset_of!(Particle, velocity), 16);
    }

    #[test]
    fn accessors_round_trip_components() {
        let p = Particle::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 0.0));
        assert_eq!(p.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.velocity(), Vec3::new(-1.0, 0.5, 0.0));
        assert!(p.is_finite());
    }

    #[test]
    fn non_finite_components_detected() {
        let p = Particle::new(Vec3::new(0.0, f32::NAN, 0.0), Vec3::ZERO);
        assert!(!p.is_finite());
        let p = Particle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, f32::INFINITY));
        assert!(!p.is_finite());
    }

    #[test]
    fn zeroed_matches_zero_constant() {
        assert_eq!(Particle::zeroed(), Particle::ZERO);
        assert_eq!(Particle::default(), Particle::ZERO);
    }
}
