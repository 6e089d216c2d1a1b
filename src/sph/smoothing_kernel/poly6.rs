use super::kernel::Kernel;
use crate::units::{Real, Vector};

/// Poly6 smoothing kernel.
///
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
/// Kernel not well suited for computing pressure forces since derivative approaches zero.
#[derive(Copy, Clone)]
pub struct Poly6 {
    hsq: Real,
    normalizer: Real,
    normalizer_grad: Real,
}

impl Poly6 {
    pub fn new(smoothing_length: Real) -> Poly6 {
        let h9 = smoothing_length.powi(9);
        Poly6 {
            hsq: smoothing_length * smoothing_length,
            normalizer: 315.0 / (64.0 * std::f32::consts::PI * h9),
            normalizer_grad: 945.0 / (32.0 * std::f32::consts::PI * h9),
        }
    }
}

impl Kernel for Poly6 {
    #[inline]
    fn evaluate(&self, r_sq: Real, _r: Real) -> Real {
        if r_sq >= self.hsq {
            return 0.0;
        }
        let dsq = self.hsq - r_sq;
        self.normalizer * dsq * dsq * dsq
    }

    #[inline]
    fn gradient(&self, ri_to_rj: Vector, r_sq: Real, _r: Real) -> Vector {
        if r_sq >= self.hsq {
            return cgmath::Zero::zero();
        }
        let dsq = self.hsq - r_sq;
        (self.normalizer_grad * dsq * dsq) * ri_to_rj
    }

    #[inline]
    fn laplacian(&self, r_sq: Real, _r: Real) -> Real {
        if r_sq >= self.hsq {
            return 0.0;
        }
        -self.normalizer_grad * (self.hsq - r_sq) * (3.0 * self.hsq - 7.0 * r_sq)
    }
}

generate_kernel_tests!(Poly6);
