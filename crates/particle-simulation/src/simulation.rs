//! Driver-facing particle simulation session
//!
//! Owns the particle store, the current configuration and the scheduler.
//! The external driver calls `init` once (or more; it is idempotent), then
//! `step` once per frame, and reads positions back for rendering.

use std::collections::HashSet;

use glam::Vec3;
use particle_physics::{Particle, STABILITY_LIMIT};

use crate::dispatch::{DispatchReport, StepScheduler};
use crate::error::{Result, SimulationError};
use crate::params::SimulationConfig;
use crate::store::ParticleStore;

/// Lifecycle of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; the init pass has not run
    Loading,
    /// Initialized and idle between steps
    Ready,
}

/// CPU particle simulation
pub struct ParticleSimulation {
    store: ParticleStore,
    config: SimulationConfig,
    scheduler: StepScheduler,
    state: SessionState,
    steps: u64,
    // (stiffness, dt) bit patterns already flagged by the stability check
    warned_stability: HashSet<(u32, u32)>,
}

impl ParticleSimulation {
    pub fn new(store: ParticleStore, config: SimulationConfig) -> Result<Self> {
        Self::with_scheduler(store, config, StepScheduler::default())
    }

    pub fn with_scheduler(
        store: ParticleStore,
        config: SimulationConfig,
        scheduler: StepScheduler,
    ) -> Result<Self> {
        config.validate(store.capacity())?;
        log::info!(
            "Creating ParticleSimulation: capacity {}, {} active, workgroup size {}",
            store.capacity(),
            config.active_count,
            scheduler.workgroup_size()
        );
        Ok(Self {
            store,
            config,
            scheduler,
            state: SessionState::Loading,
            steps: 0,
            warned_stability: HashSet::new(),
        })
    }

    /// One-time setup hook. Runs the init kernel over the first
    /// `particle_count` slots; the kernel does not change particle state, so
    /// repeated calls are harmless.
    pub fn init(&mut self, particle_count: u32) -> Result<()> {
        let capacity = self.store.capacity();
        if particle_count > capacity {
            return Err(SimulationError::CapacityExceeded {
                requested: particle_count,
                capacity,
            });
        }
        let report = self.scheduler.run_init(&mut self.store, particle_count);
        log::debug!(
            "Init pass: {} invocations, {} slots seeded",
            report.invocations,
            report.written
        );
        if self.state == SessionState::Loading {
            log::info!("✓ Simulation initialized ({particle_count} particles)");
            self.state = SessionState::Ready;
        }
        Ok(())
    }

    /// Advance by one step with `active_count` particles and step `time_delta`.
    /// Other parameters come from the current configuration.
    pub fn step(&mut self, active_count: u32, time_delta: f32) -> Result<DispatchReport> {
        let config = self
            .config
            .clone()
            .with_active_count(active_count)
            .with_time_delta(time_delta);
        self.step_with(config)
    }

    /// Replace the configuration and advance by one step
    pub fn step_with(&mut self, config: SimulationConfig) -> Result<DispatchReport> {
        if self.state != SessionState::Ready {
            return Err(SimulationError::NotInitialized);
        }
        config.validate(self.store.capacity())?;
        self.check_stability(&config);
        self.config = config;

        let report = self.scheduler.run_step(&mut self.store, &self.config);
        self.steps += 1;
        log::debug!(
            "Step {}: {} invocations, {} particles updated",
            self.steps,
            report.invocations,
            report.written
        );
        Ok(report)
    }

    /// Advance by one step with the current configuration
    pub fn advance(&mut self) -> Result<DispatchReport> {
        self.step_with(self.config.clone())
    }

    /// Warn once per distinct unstable (stiffness, dt) pair. Returns whether
    /// a warning was emitted.
    fn check_stability(&mut self, config: &SimulationConfig) -> bool {
        if config.physics.is_stable_for(config.time_delta) {
            return false;
        }
        let key = (
            config.physics.restitution_stiffness.to_bits(),
            config.time_delta.to_bits(),
        );
        if !self.warned_stability.insert(key) {
            return false;
        }
        log::warn!(
            "stiffness * dt² = {:.4} exceeds {STABILITY_LIMIT}; floor bounces may diverge",
            config.physics.spring_stability(config.time_delta)
        );
        true
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Completed steps since construction
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn capacity(&self) -> u32 {
        self.store.capacity()
    }

    pub fn particle(&self, index: u32) -> Particle {
        self.store.get(index)
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    /// Per-instance offsets for rendering, one per store slot
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.store.positions()
    }

    /// Store contents ready for a storage-buffer upload
    pub fn particle_bytes(&self) -> &[u8] {
        self.store.as_bytes()
    }
}
