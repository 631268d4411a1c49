//! Data-parallel dispatch of kernel invocations
//!
//! A dispatch is a whole number of fixed-size workgroups, so its width is
//! usually larger than the particle count. Every invocation in the dispatch
//! runs exactly once; the kernel's range guard discards the surplus.
//!
//! A step is split in two phases separated by a barrier. The read phase runs
//! every invocation against an immutable borrow of the store and collects
//! the resulting particles; the write phase commits each one to the slot of
//! the invocation that produced it. No invocation can observe another
//! invocation's write from the same step.

use particle_physics::Particle;
use rayon::prelude::*;

use crate::error::{Result, SimulationError};
use crate::kernel::{init_particle, update_particle};
use crate::params::SimulationConfig;
use crate::store::ParticleStore;

/// Invocations per workgroup (8x8 flattened)
pub const WORKGROUP_SIZE: u32 = 64;

/// Dispatches narrower than this run on the calling thread
pub const PARALLEL_THRESHOLD: u32 = 512;

/// Shape of one dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    workgroup_size: u32,
    workgroup_count: u32,
}

impl Dispatch {
    /// Smallest dispatch with at least `count` invocations
    pub fn covering(count: u32, workgroup_size: u32) -> Result<Self> {
        if workgroup_size == 0 {
            return Err(SimulationError::InvalidWorkgroupSize);
        }
        Ok(Self {
            workgroup_size,
            workgroup_count: count.div_ceil(workgroup_size),
        })
    }

    /// Dispatch of an explicit number of workgroups, regardless of how many
    /// particles are active
    pub fn fixed(workgroup_count: u32, workgroup_size: u32) -> Result<Self> {
        if workgroup_size == 0 {
            return Err(SimulationError::InvalidWorkgroupSize);
        }
        Ok(Self {
            workgroup_size,
            workgroup_count,
        })
    }

    pub fn workgroup_size(&self) -> u32 {
        self.workgroup_size
    }

    pub fn workgroup_count(&self) -> u32 {
        self.workgroup_count
    }

    /// Total invocations, saturating at `u32::MAX`
    pub fn invocation_count(&self) -> u32 {
        self.workgroup_count.saturating_mul(self.workgroup_size)
    }
}

/// Outcome of one dispatch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Invocations launched, including guarded ones
    pub invocations: u32,
    /// Slots written back to the store
    pub written: u32,
}

impl DispatchReport {
    /// Invocations that returned at the range guard
    pub fn guarded(&self) -> u32 {
        self.invocations - self.written
    }
}

/// Fans kernel invocations out over the particle store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepScheduler {
    workgroup_size: u32,
    parallel_threshold: u32,
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self {
            workgroup_size: WORKGROUP_SIZE,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl StepScheduler {
    pub fn new(workgroup_size: u32) -> Result<Self> {
        if workgroup_size == 0 {
            return Err(SimulationError::InvalidWorkgroupSize);
        }
        Ok(Self {
            workgroup_size,
            ..Self::default()
        })
    }

    /// Use the thread pool only for dispatches of at least `threshold`
    /// invocations. `0` always goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: u32) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn workgroup_size(&self) -> u32 {
        self.workgroup_size
    }

    /// Dispatch covering `count` invocations with this scheduler's workgroups
    pub fn dispatch_for(&self, count: u32) -> Dispatch {
        Dispatch {
            workgroup_size: self.workgroup_size,
            workgroup_count: count.div_ceil(self.workgroup_size),
        }
    }

    /// Run the init pass over the first `particle_count` slots
    pub fn run_init(&self, store: &mut ParticleStore, particle_count: u32) -> DispatchReport {
        let dispatch = self.dispatch_for(particle_count);
        self.run_kernel(dispatch, store, |invocation, particles| {
            init_particle(invocation, particle_count, particles)
        })
    }

    /// Advance every active particle by one step
    pub fn run_step(
        &self,
        store: &mut ParticleStore,
        config: &SimulationConfig,
    ) -> DispatchReport {
        self.update(self.dispatch_for(config.active_count), store, config)
    }

    /// Advance one step using an explicit dispatch shape.
    ///
    /// The dispatch may be wider than the store but must reach every active
    /// particle; a narrower one is rejected before anything runs.
    pub fn run_step_with(
        &self,
        dispatch: Dispatch,
        store: &mut ParticleStore,
        config: &SimulationConfig,
    ) -> Result<DispatchReport> {
        if dispatch.invocation_count() < config.active_count {
            return Err(SimulationError::DispatchTooNarrow {
                invocations: dispatch.invocation_count(),
                active: config.active_count,
            });
        }
        Ok(self.update(dispatch, store, config))
    }

    fn update(
        &self,
        dispatch: Dispatch,
        store: &mut ParticleStore,
        config: &SimulationConfig,
    ) -> DispatchReport {
        self.run_kernel(dispatch, store, |invocation, particles| {
            update_particle(invocation, particles, config)
        })
    }

    /// Run `kernel` once per invocation of `dispatch`, then commit its
    /// results. `kernel` receives the invocation index and the pre-step
    /// store, and returns the new state of slot `invocation`, or `None` to
    /// leave the store untouched.
    pub fn run_kernel<K>(
        &self,
        dispatch: Dispatch,
        store: &mut ParticleStore,
        kernel: K,
    ) -> DispatchReport
    where
        K: Fn(u32, &[Particle]) -> Option<Particle> + Sync,
    {
        let invocations = dispatch.invocation_count();
        let snapshot = store.as_slice();
        let run = |invocation: u32| kernel(invocation, snapshot).map(|p| (invocation, p));

        let updates: Vec<(u32, Particle)> = if invocations < self.parallel_threshold {
            (0..invocations).filter_map(run).collect()
        } else {
            (0..invocations).into_par_iter().filter_map(run).collect()
        };

        // Barrier: all reads of this step are complete
        let written = updates.len() as u32;
        for (index, particle) in updates {
            store.set(index, particle);
        }

        DispatchReport { invocations, written }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn covering_rounds_up_to_whole_workgroups() -> Result<()> {
        let d = Dispatch::covering(130, 64)?;
        assert_eq!(d.workgroup_count(), 3);
        assert_eq!(d.invocation_count(), 192);
        assert_eq!(Dispatch::covering(128, 64)?.workgroup_count(), 2);
        assert_eq!(Dispatch::covering(0, 64)?.invocation_count(), 0);
        Ok(())
    }

    #[test]
    fn zero_workgroup_size_rejected() {
        assert_eq!(
            Dispatch::covering(10, 0).unwrap_err(),
            SimulationError::InvalidWorkgroupSize
        );
        assert_eq!(
            Dispatch::fixed(10, 0).unwrap_err(),
            SimulationError::InvalidWorkgroupSize
        );
        assert_eq!(
            StepScheduler::new(0).unwrap_err(),
            SimulationError::InvalidWorkgroupSize
        );
    }

    #[test]
    fn invocation_count_saturates() -> Result<()> {
        let d = Dispatch::fixed(u32::MAX, 2)?;
        assert_eq!(d.invocation_count(), u32::MAX);
        Ok(())
    }

    fn count_invocations(scheduler: StepScheduler) -> Result<()> {
        let mut store = ParticleStore::new(100)?;
        let dispatch = Dispatch::covering(100, 8)?;
        let counters: Vec<AtomicU32> = (0..dispatch.invocation_count())
            .map(|_| AtomicU32::new(0))
            .collect();

        let report = scheduler.run_kernel(dispatch, &mut store, |invocation, particles| {
            counters[invocation as usize].fetch_add(1, Ordering::Relaxed);
            if invocation >= 37 {
                return None;
            }
            Some(Particle::at_rest(Vec3::splat(invocation as f32) + particles[0].position()))
        });

        assert!(counters.iter().all(|c| c.load(Ordering::Relaxed) == 1));
        assert_eq!(report.invocations, 104);
        assert_eq!(report.written, 37);
        assert_eq!(report.guarded(), 67);
        for i in 0..100u32 {
            let expected = if i < 37 {
                Particle::at_rest(Vec3::splat(i as f32))
            } else {
                Particle::ZERO
            };
            assert_eq!(store.get(i), expected, "slot {i}");
        }
        Ok(())
    }

    #[test]
    fn every_invocation_runs_once_sequential() -> Result<()> {
        count_invocations(StepScheduler::new(8)?.with_parallel_threshold(u32::MAX))
    }

    #[test]
    fn every_invocation_runs_once_parallel() -> Result<()> {
        count_invocations(StepScheduler::new(8)?.with_parallel_threshold(0))
    }

    #[test]
    fn kernel_reads_pre_step_snapshot() -> Result<()> {
        // Each slot copies its left neighbour. With phase separation every
        // slot sees the neighbour's old value, so values shift by one.
        let particles = (0..10)
            .map(|i| Particle::at_rest(Vec3::splat(i as f32)))
            .collect();
        let mut store = ParticleStore::from_particles(particles)?;
        let scheduler = StepScheduler::new(4)?.with_parallel_threshold(0);
        scheduler.run_kernel(scheduler.dispatch_for(10), &mut store, |invocation, particles| {
            if invocation == 0 || invocation >= 10 {
                return None;
            }
            Some(particles[invocation as usize - 1])
        });
        for i in 1..10u32 {
            assert_eq!(store.get(i).position(), Vec3::splat((i - 1) as f32));
        }
        assert_eq!(store.get(0).position(), Vec3::ZERO);
        Ok(())
    }

    #[test]
    fn wide_dispatch_past_capacity_is_guarded() -> Result<()> {
        let mut store = ParticleStore::new(3)?;
        let config = SimulationConfig::new(2);
        let scheduler = StepScheduler::default();
        let report = scheduler.run_step_with(Dispatch::fixed(4, 64)?, &mut store, &config)?;
        assert_eq!(report.invocations, 256);
        assert_eq!(report.written, 2);
        Ok(())
    }

    #[test]
    fn narrow_dispatch_rejected_without_stepping() -> Result<()> {
        let particles = (0..100)
            .map(|i| Particle::at_rest(Vec3::new(i as f32, 0.0, 1.0)))
            .collect::<Vec<_>>();
        let mut store = ParticleStore::from_particles(particles.clone())?;
        let config = SimulationConfig::new(100)
            .with_force_model(particle_physics::ForceModel::gravity_only());
        let scheduler = StepScheduler::default();

        let err = scheduler
            .run_step_with(Dispatch::fixed(1, 64)?, &mut store, &config)
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::DispatchTooNarrow {
                invocations: 64,
                active: 100
            }
        );
        assert_eq!(store.as_slice(), &particles[..], "no slot may move");

        // Two workgroups reach all 100 active particles
        let report = scheduler.run_step_with(Dispatch::fixed(2, 64)?, &mut store, &config)?;
        assert_eq!(report.written, 100);
        assert!(store.as_slice().iter().all(|p| p.velocity().z < 0.0));
        Ok(())
    }
}
