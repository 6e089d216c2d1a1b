use cgmath::prelude::*;
use criterion::{black_box, criterion_group, Criterion};
use rand::prelude::*;

use sph3d::sph::spatial_hash::{ParticleIndex, SpatialHash};
use sph3d::units::*;

fn bench_spatial_hash(c: &mut Criterion) {
    const NUM_POSITIONS: usize = 20000;
    const DENSITY: Real = 10.0;
    let search_radius = black_box(1.0);

    let mut rng: rand::rngs::SmallRng = rand::SeedableRng::seed_from_u64(123456789);
    let extent = (NUM_POSITIONS as Real / DENSITY).cbrt();
    let positions: Vec<Point> = std::iter::repeat_with(|| Point::from_vec(rng.gen::<Vector>() * extent))
        .take(NUM_POSITIONS)
        .collect();
    // every particle moves a bit, a few of them across cell borders
    let moved_positions: Vec<Point> = positions.iter().map(|p| *p + rng.gen::<Vector>() * 0.1).collect();

    let mut hash = SpatialHash::new(search_radius);
    for (i, p) in positions.iter().enumerate() {
        hash.insert(*p, i as ParticleIndex).unwrap();
    }

    c.bench_function(
        &format!(
            "spatial_hash.update_position (warm), {} positions, {} density, {} cell size",
            NUM_POSITIONS, DENSITY, search_radius
        ),
        |b| {
            let mut flip = false;
            b.iter(|| {
                let source = if flip { &positions } else { &moved_positions };
                for (i, p) in source.iter().enumerate() {
                    hash.update_position(*p, i as ParticleIndex);
                }
                flip = !flip;
            })
        },
    );

    c.bench_function(
        &format!(
            "spatial_hash.foreach_potential_neighbor, {} positions, {} density, {} search_radius",
            NUM_POSITIONS, DENSITY, search_radius
        ),
        |b| {
            let mut pindex = 0; // cycle through position for a more balanced result
            b.iter(|| {
                let mut accum: Vector = Zero::zero();
                hash.foreach_potential_neighbor(positions[pindex], search_radius, |i| {
                    accum += positions[i as usize].to_vec();
                });
                pindex = (pindex + 1) % NUM_POSITIONS;
                accum
            })
        },
    );
}

fn config() -> Criterion {
    Criterion::default().warm_up_time(core::time::Duration::new(0, 1000))
}

criterion_group!(
    name = spatial_hash;
    config = config();
    targets = bench_spatial_hash
);
