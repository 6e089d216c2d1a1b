use criterion::{black_box, criterion_group, Criterion};

use sph3d::sph::*;
use sph3d::units::*;

fn bench_simulation_step(c: &mut Criterion) {
    let parameters = SimulationParameters::default();
    let seeding = GridSeeding {
        count: 4096,
        ..Default::default()
    };
    let mut rng: rand::rngs::SmallRng = rand::SeedableRng::seed_from_u64(123456789);
    let mut simulation = Simulation::from_seeding(parameters.clone(), &seeding, &mut rng, |i, _| i).unwrap();
    // This would probably explode in a real simulation, but we don't care here.
    simulation.refresh_colliders(&[ColliderTransform {
        position: Point::new(8.0, -0.5, 8.0),
        right: Vector::unit_x(),
        up: Vector::unit_z(),
        lossy_scale: Vector::new(20.0, 20.0, 1.0),
    }]);
    let dt = black_box(parameters.timestep);

    c.bench_function(
        &format!("bench_simulation_step - Simulation with {} particles", simulation.particles().len()),
        |b| b.iter(|| simulation.step(dt)),
    );
}

criterion_group!(simulation_step, bench_simulation_step);
