//! Headless particle step driver
//!
//! Seeds a cloud of particles above the floor, runs the N-body step for a
//! fixed number of frames and reports what the render layer would draw.

use glam::Vec3;
use particle_physics::{ForceModel, Particle, TIME_DELTA};
use particle_simulation::{ParticleSimulation, ParticleStore, SimulationConfig, SimulationError};
use rand::Rng;

const PARTICLE_COUNT: u32 = 1000;
const STEP_COUNT: u32 = 600;
const REPORT_EVERY: u32 = 100;
const SPAWN_RADIUS: f32 = 1.5;
const SPAWN_HEIGHT: f32 = 2.0;

/// Initialize particles at rest, uniformly inside a sphere above the floor
fn initialize_particles() -> Vec<Particle> {
    let mut rng = rand::rng();
    let particles: Vec<Particle> = (0..PARTICLE_COUNT)
        .map(|_| {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let cos_phi = rng.random::<f32>() * 2.0 - 1.0;
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
            let r = rng.random::<f32>().powf(1.0 / 3.0) * SPAWN_RADIUS;

            let x = r * sin_phi * theta.cos();
            let y = r * sin_phi * theta.sin();
            let z = r * cos_phi + SPAWN_HEIGHT;
            Particle::at_rest(Vec3::new(x, y, z))
        })
        .collect();

    log::info!("✓ Initialized {} particles", particles.len());
    log::info!(
        "  Particle struct size: {} bytes",
        std::mem::size_of::<Particle>()
    );
    particles
}

fn report(sim: &ParticleSimulation) {
    let active = sim.config().active_count as usize;
    let active_particles = &sim.particles()[..active];
    let (sum, lowest) = active_particles.iter().fold(
        (Vec3::ZERO, f32::INFINITY),
        |(sum, lowest), p| (sum + p.position(), lowest.min(p.position().z)),
    );
    let centroid = sum / active.max(1) as f32;
    let finite = active_particles.iter().filter(|p| p.is_finite()).count();
    log::info!(
        "step {:>4}: centroid ({:.3}, {:.3}, {:.3}), lowest z {:.3}, finite {}/{}",
        sim.step_count(),
        centroid.x,
        centroid.y,
        centroid.z,
        lowest,
        finite,
        active
    );
}

fn run() -> Result<(), SimulationError> {
    let store = ParticleStore::from_particles(initialize_particles())?;
    let config = SimulationConfig::new(PARTICLE_COUNT)
        .with_time_delta(TIME_DELTA)
        .with_force_model(ForceModel::n_body());
    log::info!("  Force terms: {:?}", config.force_model.terms());

    let mut sim = ParticleSimulation::new(store, config)?;
    log::info!("  Store capacity: {} slots", sim.capacity());
    sim.init(PARTICLE_COUNT)?;
    report(&sim);

    for frame in 1..=STEP_COUNT {
        sim.step(PARTICLE_COUNT, TIME_DELTA)?;
        if frame % REPORT_EVERY == 0 {
            report(&sim);
        }
    }

    log::info!(
        "✓ Finished {} steps, {} bytes of instance data ready for upload",
        sim.step_count(),
        sim.particle_bytes().len()
    );
    Ok(())
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting particle step simulation...");

    if let Err(err) = run() {
        log::error!("Simulation failed: {err}");
        std::process::exit(1);
    }
}
