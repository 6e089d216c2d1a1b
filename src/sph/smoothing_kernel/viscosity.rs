use super::kernel::Kernel;
use crate::units::{Real, Vector};

/// Viscosity smoothing kernel.
///
/// Müller et al.'s viscosity kernel ("Particle-Based Fluid Simulation for Interactive Applications").
/// Its laplacian is positive everywhere within the support which keeps viscous forces from adding energy.
#[derive(Copy, Clone)]
pub struct Viscosity {
    h: Real,
    normalizer: Real,
    normalizer_laplacian: Real,
}

impl Viscosity {
    const MIN_DISTANCE: Real = 1.0e-6;

    pub fn new(smoothing_length: Real) -> Viscosity {
        Viscosity {
            h: smoothing_length,
            normalizer: 15.0 / (2.0 * std::f32::consts::PI * smoothing_length.powi(3)),
            normalizer_laplacian: 45.0 / (std::f32::consts::PI * smoothing_length.powi(6)),
        }
    }
}

impl Kernel for Viscosity {
    // Singular at r=0, distance is clamped.
    #[inline]
    fn evaluate(&self, _r_sq: Real, r: Real) -> Real {
        if r >= self.h {
            return 0.0;
        }
        let q = r.max(Self::MIN_DISTANCE) / self.h;
        self.normalizer * (-0.5 * q * q * q + q * q + 0.5 / q - 1.0)
    }

    #[inline]
    fn gradient(&self, ri_to_rj: Vector, _r_sq: Real, r: Real) -> Vector {
        if r >= self.h || r < Self::MIN_DISTANCE {
            return cgmath::Zero::zero();
        }
        let q = r / self.h;
        let dw_dr = self.normalizer / self.h * (-1.5 * q * q + 2.0 * q - 0.5 / (q * q));
        // ∇W(ri - rj) = dW/dr * (ri - rj) / r
        (-dw_dr / r) * ri_to_rj
    }

    #[inline]
    fn laplacian(&self, _r_sq: Real, r: Real) -> Real {
        if r >= self.h {
            return 0.0;
        }
        self.normalizer_laplacian * (self.h - r)
    }
}

generate_kernel_tests!(Viscosity);
