use super::super::parameters::SimulationParameters;
use super::super::particles::{foreach_neighbor_particle, Particles};
use super::super::smoothing_kernel;
use super::super::smoothing_kernel::Kernel;
use super::super::spatial_hash::SpatialHash;
use super::super::viscositymodel::ViscosityModel;
use super::{IntegrationStatistics, MIN_DENSITY};
use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

// Force based SPH as in "Particle-Based Fluid Simulation for Interactive Applications", Müller et al. 2003
// Pressure from the ideal gas equation of state, no surface tension.
pub struct MullerSolver<TViscosityModel: ViscosityModel> {
    viscosity_model: TViscosityModel,
    pressure_kernel: smoothing_kernel::Spiky,
}

/// Pressure force particle j exerts on particle i, −m (pi + pj) / (2 ρj) ∇W(ri − rj).
///
/// Positive pressures push the two particles apart.
#[inline]
pub fn pressure_force(mass: Real, pressure_i: Real, pressure_j: Real, density_j: Real, kernel_gradient: Vector) -> Vector {
    -mass * (pressure_i + pressure_j) / (2.0 * density_j.max(MIN_DENSITY)) * kernel_gradient
}

#[inline]
fn is_finite(v: Vector) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

impl<TViscosityModel: ViscosityModel + std::marker::Sync> MullerSolver<TViscosityModel> {
    pub fn new(viscosity_model: TViscosityModel, smoothing_length: Real) -> MullerSolver<TViscosityModel> {
        MullerSolver {
            viscosity_model,
            pressure_kernel: smoothing_kernel::Spiky::new(smoothing_length),
        }
    }

    /// Overwrites every particle's force with pressure + viscosity + gravity.
    ///
    /// Reads densities and pressures of the current step, so those need to be fully updated before.
    pub fn update_forces<H>(&self, particles: &mut Particles<H>, spatial_hash: &SpatialHash, parameters: &SimulationParameters) {
        microprofile::scope!("MullerSolver", "update_forces");

        let mass = parameters.particle_mass;
        let smoothing_length = parameters.smoothing_radius;
        let gravity = parameters.gravity * parameters.gravity_multiplier;
        let pressure_kernel = self.pressure_kernel;
        let viscosity_model = &self.viscosity_model;

        let positions = &particles.positions;
        let velocities = &particles.velocities;
        let densities = &particles.densities;
        let pressures = &particles.pressures;

        particles
            .forces
            .par_iter_mut()
            .zip((positions, velocities, densities, pressures).into_par_iter())
            .enumerate()
            .for_each(|(i, (force, (&ri, &vi, &rhoi, &pi)))| {
                let mut force_pressure = Vector::zero();
                let mut force_viscosity = Vector::zero();

                foreach_neighbor_particle(
                    positions,
                    spatial_hash,
                    smoothing_length,
                    ri,
                    #[inline(always)]
                    |j, r_sq, ri_to_rj| {
                        // Coinciding neighbors still exchange viscosity, the pressure gradient vanishes for them.
                        if j == i {
                            return;
                        }
                        let r = r_sq.sqrt();
                        let rhoj = densities[j].max(MIN_DENSITY);

                        force_pressure += pressure_force(mass, pi, pressures[j], rhoj, pressure_kernel.gradient(ri_to_rj, r_sq, r));
                        force_viscosity += viscosity_model.compute_viscous_force(r_sq, r, mass, rhoj, velocities[j] - vi);
                    },
                );

                // Gravity scales with density since the integrator divides by it.
                *force = force_pressure + force_viscosity + gravity * rhoi;
            });
    }

    /// Semi-implicit Euler: velocity from force first, then position from the updated velocity.
    pub fn integrate<H>(&self, particles: &mut Particles<H>, dt: Real) -> IntegrationStatistics {
        microprofile::scope!("MullerSolver", "integrate");
        let mut statistics = IntegrationStatistics::default();

        // This got actually slower for a parallel for loop with a few thousand particles.
        for (((pos, v), f), &rho) in particles
            .positions
            .iter_mut()
            .zip(particles.velocities.iter_mut())
            .zip(particles.forces.iter())
            .zip(particles.densities.iter())
        {
            if !(rho >= MIN_DENSITY) {
                statistics.clamped_densities += 1;
            }
            let new_velocity = *v + *f * (dt / rho.max(MIN_DENSITY));
            let new_position = *pos + new_velocity * dt;

            if is_finite(new_velocity) && is_finite(new_position.to_vec()) {
                *v = new_velocity;
                *pos = new_position;
            } else {
                // Keep the particle where it was and let it restart from rest.
                *v = Vector::zero();
                statistics.recovered_particles += 1;
            }
        }
        statistics
    }
}
