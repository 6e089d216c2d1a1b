use std::collections::VecDeque;
use std::time::{Duration, Instant};

use sph3d::sph::*;
use sph3d::units::*;

use microprofile;

const DEFAULT_NUM_STEPS: u64 = 2000;
const REPORT_INTERVAL: u64 = 250;
const SIMULATION_STEP_HISTORY_LENGTH: usize = 80;

// Open box around the default seeding: floor plus four walls.
fn container() -> Vec<ColliderTransform> {
    let center = Point::new(7.5, 8.0, 7.5);
    let wall = |offset: Vector, right: Vector| ColliderTransform {
        position: center + offset,
        right,
        up: Vector::unit_y(),
        lossy_scale: Vector::new(20.0, 20.0, 1.0),
    };
    vec![
        ColliderTransform {
            position: Point::new(7.5, -0.5, 7.5),
            right: Vector::unit_x(),
            up: Vector::unit_z(),
            lossy_scale: Vector::new(20.0, 20.0, 1.0),
        },
        wall(Vector::new(-9.0, 0.0, 0.0), Vector::unit_z()),
        wall(Vector::new(9.0, 0.0, 0.0), Vector::unit_z()),
        wall(Vector::new(0.0, 0.0, -9.0), Vector::unit_x()),
        wall(Vector::new(0.0, 0.0, 9.0), Vector::unit_x()),
    ]
}

fn main() -> Result<(), ConfigurationError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    microprofile::init!();
    microprofile::set_enable_all_groups!(true);

    let num_steps = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        Some(Ok(num_steps)) => num_steps,
        Some(Err(err)) => {
            log::error!("invalid step count: {}", err);
            return Ok(());
        }
        None => DEFAULT_NUM_STEPS,
    };

    let parameters = SimulationParameters::default();
    let mut rng: rand::rngs::SmallRng = rand::SeedableRng::seed_from_u64(0);
    let mut simulation = Simulation::from_seeding(parameters.clone(), &GridSeeding::default(), &mut rng, |i, _| i)?;
    simulation.refresh_colliders(&container());

    let mut time_manager = TimeManager::fixed(parameters.timestep);
    let mut step_duration_history = VecDeque::with_capacity(SIMULATION_STEP_HISTORY_LENGTH);
    let mut total_processing_time = Duration::default();
    let mut num_recovered = 0;

    for _ in 0..num_steps {
        microprofile::scope!("main", "step");
        let step_start = Instant::now();
        let statistics = simulation.advance(&mut time_manager);
        let step_processing_time = step_start.elapsed();

        total_processing_time += step_processing_time;
        num_recovered += statistics.recovered_particles;
        if step_duration_history.len() == SIMULATION_STEP_HISTORY_LENGTH {
            step_duration_history.pop_front();
        }
        step_duration_history.push_back(step_processing_time);

        if time_manager.num_steps() % REPORT_INTERVAL == 0 {
            let average_step_duration = step_duration_history.iter().sum::<Duration>() / step_duration_history.len() as u32;
            log::info!(
                "SimTime {:.2}s ({} steps) | Single Step (averaged): {:.2}ms | max speed {:.2} | kinetic energy {:.2} | {} contacts",
                time_manager.passed_time(),
                time_manager.num_steps(),
                average_step_duration.as_secs_f64() * 1000.0,
                statistics.max_speed,
                simulation.kinetic_energy(),
                statistics.collider_contacts,
            );
        }
        microprofile::flip!();
    }

    let mut lowest = Real::MAX;
    let mut highest = Real::MIN;
    simulation.publish(|_, position, _| {
        lowest = lowest.min(position.y);
        highest = highest.max(position.y);
    });
    log::info!(
        "finished {} steps in {:.2}s processing time, fluid spans y = {:.2}..{:.2}, momentum {:?}, {} particle resets",
        simulation.step_count(),
        total_processing_time.as_secs_f64(),
        lowest,
        highest,
        simulation.total_momentum(),
        num_recovered,
    );

    Ok(())
}
