//! Per-step simulation parameters

use bytemuck::{Pod, Zeroable};
use particle_physics::{ForceModel, ForceTerm, PhysicsParams, TIME_DELTA};

use crate::error::{Result, SimulationError};

/// Parameters shared read-only by every invocation of one step.
///
/// Replaced wholesale between steps; never mutated while a step runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of leading store slots that take part in the step
    pub active_count: u32,
    /// Step duration
    pub time_delta: f32,
    /// Named physical constants
    pub physics: PhysicsParams,
    /// Force terms applied to every active particle
    pub force_model: ForceModel,
}

impl SimulationConfig {
    pub fn new(active_count: u32) -> Self {
        Self {
            active_count,
            time_delta: TIME_DELTA,
            physics: PhysicsParams::default(),
            force_model: ForceModel::default(),
        }
    }

    pub fn with_active_count(mut self, active_count: u32) -> Self {
        self.active_count = active_count;
        self
    }

    pub fn with_time_delta(mut self, time_delta: f32) -> Self {
        self.time_delta = time_delta;
        self
    }

    pub fn with_physics(mut self, physics: PhysicsParams) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_force_model(mut self, force_model: ForceModel) -> Self {
        self.force_model = force_model;
        self
    }

    /// Boundary checks a driver should run before handing the config to the
    /// kernel. The kernel itself trusts `active_count <= capacity`.
    pub fn validate(&self, capacity: u32) -> Result<()> {
        if self.active_count > capacity {
            return Err(SimulationError::CapacityExceeded {
                requested: self.active_count,
                capacity,
            });
        }
        if !self.time_delta.is_finite() || self.time_delta < 0.0 {
            return Err(SimulationError::InvalidTimeDelta(self.time_delta));
        }
        Ok(())
    }

    /// Pack into the uniform layout a GPU dispatch would bind
    pub fn uniform(&self) -> ConfigUniform {
        let enabled = |term| u32::from(self.force_model.contains(term));
        ConfigUniform {
            counts: [self.active_count, 0, 0, 0],
            integration: [
                self.time_delta,
                self.physics.gravity,
                self.physics.floor_height,
                self.physics.restitution_stiffness,
            ],
            attraction: [self.physics.attraction_strength, self.physics.softening, 0.0, 0.0],
            terms: [
                enabled(ForceTerm::FloorCollision),
                enabled(ForceTerm::PairwiseAttraction),
                enabled(ForceTerm::UniformGravity),
                0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ConfigUniform {
    // x: active_count, y-w: padding
    pub counts: [u32; 4],

    // x: dt, y: gravity, z: floor_height, w: restitution_stiffness
    pub integration: [f32; 4],

    // x: attraction_strength, y: softening, z-w: padding
    pub attraction: [f32; 4],

    // x: floor, y: attraction, z: gravity (1 = enabled), w: padding
    pub terms: [u32; 4],
}
