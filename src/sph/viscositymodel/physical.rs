use super::ViscosityModel;

use super::super::smoothing_kernel::*;
use crate::units::*;

// Laplacian based physical model as in "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
#[derive(Copy, Clone)]
pub struct PhysicalViscosityModel {
    pub fluid_viscosity: Real, // μ, zero disables viscosity altogether
    kernel: Viscosity,
}
impl PhysicalViscosityModel {
    pub fn new(smoothing_length: Real, fluid_viscosity: Real) -> PhysicalViscosityModel {
        PhysicalViscosityModel {
            fluid_viscosity,
            kernel: Viscosity::new(smoothing_length),
        }
    }
}
impl ViscosityModel for PhysicalViscosityModel {
    #[inline]
    fn compute_viscous_force(&self, r_sq: Real, r: Real, massj: Real, rhoj: Real, velocitydiff: Vector) -> Vector {
        self.fluid_viscosity * massj * self.kernel.laplacian(r_sq, r) / rhoj * velocitydiff
    }
}
