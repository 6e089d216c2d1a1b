use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

use super::smoothing_kernel::Kernel;
use super::spatial_hash::{ParticleIndex, SpatialHash};

/// Copy of a single particle's simulation state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Vector,
    pub force: Vector,
    pub density: Real,
    pub pressure: Real,
}

/// Calls `f` for every particle j (including i itself) with |ri - rj|² < smoothing_length_sq.
#[inline(always)]
pub(super) fn foreach_neighbor_particle(
    positions: &[Point],
    spatial_hash: &SpatialHash,
    smoothing_length: Real,
    ri: Point,
    mut f: impl FnMut(usize, Real, Vector),
) {
    let smoothing_length_sq = smoothing_length * smoothing_length;
    spatial_hash.foreach_potential_neighbor(
        ri,
        smoothing_length,
        #[inline(always)]
        |j: ParticleIndex| {
            let j = j as usize;
            let ri_to_rj = positions[j] - ri;
            let r_sq = ri_to_rj.magnitude2();
            if r_sq >= smoothing_length_sq {
                return;
            }
            f(j, r_sq, ri_to_rj);
        },
    );
}

/// Fixed size particle population, stored as one array per attribute.
///
/// `H` is an opaque handle the host associates with each particle (e.g. a render object). It is never inspected.
pub struct Particles<H> {
    pub positions: Vec<Point>,
    pub velocities: Vec<Vector>,
    pub forces: Vec<Vector>,  // recomputed every step
    pub densities: Vec<Real>, // Local densities ρ, recomputed every step
    pub pressures: Vec<Real>, // recomputed every step from densities

    handles: Vec<H>,
}

impl<H> Particles<H> {
    pub fn new(positions_and_handles: impl IntoIterator<Item = (Point, H)>) -> Particles<H> {
        let (positions, handles): (Vec<Point>, Vec<H>) = positions_and_handles.into_iter().unzip();
        let num_particles = positions.len();
        Particles {
            positions,
            velocities: vec![Zero::zero(); num_particles],
            forces: vec![Zero::zero(); num_particles],
            densities: vec![0.0; num_particles],
            pressures: vec![0.0; num_particles],
            handles,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn get(&self, i: usize) -> Particle {
        Particle {
            position: self.positions[i],
            velocity: self.velocities[i],
            force: self.forces[i],
            density: self.densities[i],
            pressure: self.pressures[i],
        }
    }

    /// Computes ρi = Σj m W(|ri - rj|) and the ideal gas pressure k (ρi - ρ0) for every particle.
    ///
    /// The spatial hash needs to be up to date with the current positions.
    pub(super) fn update_densities_and_pressures(
        &mut self,
        spatial_hash: &SpatialHash,
        kernel: impl Kernel + std::marker::Sync,
        smoothing_length: Real,
        mass: Real,
        gas_constant: Real,
        rest_density: Real,
    ) {
        microprofile::scope!("Particles", "update_densities_and_pressures");
        assert_eq!(self.positions.len(), self.densities.len());

        // Density contributions are symmetric, but that is hard to use in a parallel loop.
        let positions = &self.positions;

        self.densities
            .par_iter_mut()
            .zip(self.pressures.par_iter_mut())
            .zip(positions.par_iter())
            .for_each(|((density, pressure), &ri)| {
                *density = 0.0;
                // self-contribution is part of the neighborhood
                foreach_neighbor_particle(
                    positions,
                    spatial_hash,
                    smoothing_length,
                    ri,
                    #[inline(always)]
                    |_, r_sq, _| {
                        *density += kernel.evaluate(r_sq, r_sq.sqrt()) * mass;
                    },
                );
                // Equation of state (ideal gas)
                *pressure = gas_constant * (*density - rest_density);
            });
    }

    pub fn total_momentum(&self, mass: Real) -> Vector {
        self.velocities.iter().fold(Vector::zero(), |sum, v| sum + *v * mass)
    }

    pub fn kinetic_energy(&self, mass: Real) -> Real {
        self.velocities.iter().map(|v| 0.5 * mass * v.magnitude2()).sum()
    }

    pub fn max_speed(&self) -> Real {
        self.velocities.iter().map(|v| v.magnitude2()).fold(0.0, Real::max).sqrt()
    }
}
