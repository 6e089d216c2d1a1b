use super::kernel::Kernel;
use crate::units::{Real, Vector};

/// Debrun's "Spiky" smoothing kernel.
///
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
/// Kernel well suited for pressure since its gradient doesn't vanish at the center.
#[derive(Copy, Clone)]
pub struct Spiky {
    h: Real,
    normalizer: Real,
    normalizer_grad: Real,
}

impl Spiky {
    const MIN_DISTANCE: Real = 1.0e-6;

    pub fn new(smoothing_length: Real) -> Spiky {
        let h6 = smoothing_length.powi(6);
        Spiky {
            h: smoothing_length,
            normalizer: 15.0 / (std::f32::consts::PI * h6),
            normalizer_grad: 45.0 / (std::f32::consts::PI * h6),
        }
    }
}

impl Kernel for Spiky {
    #[inline]
    fn evaluate(&self, _r_sq: Real, r: Real) -> Real {
        if r >= self.h {
            return 0.0;
        }
        let hsubr = self.h - r;
        self.normalizer * hsubr * hsubr * hsubr
    }

    // Direction is undefined for coincident points, those get no gradient at all.
    #[inline]
    fn gradient(&self, ri_to_rj: Vector, _r_sq: Real, r: Real) -> Vector {
        if r >= self.h || r < Self::MIN_DISTANCE {
            return cgmath::Zero::zero();
        }
        let hsubr = self.h - r;
        (self.normalizer_grad * hsubr * hsubr / r) * ri_to_rj
    }

    #[inline]
    fn laplacian(&self, _r_sq: Real, r: Real) -> Real {
        if r >= self.h {
            return 0.0;
        }
        let r = r.max(Self::MIN_DISTANCE);
        2.0 * self.normalizer_grad * (self.h - r) * (2.0 * r - self.h) / r
    }
}

generate_kernel_tests!(Spiky);

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::prelude::*;

    #[test]
    fn gradient_points_towards_neighbor() {
        let kernel = Spiky::new(1.0);
        let ri_to_rj = Vector::new(0.0, 0.5, 0.0);
        let gradient = kernel.gradient(ri_to_rj, 0.25, 0.5);
        assert!(gradient.dot(ri_to_rj) > 0.0);
        // |∇W| = 45/(π h⁶) (h - r)²
        let expected = 45.0 / std::f32::consts::PI * 0.25;
        assert!((gradient.magnitude() - expected).abs() < 1e-5);
    }

    #[test]
    fn no_gradient_for_coincident_points() {
        let kernel = Spiky::new(1.0);
        assert_eq!(kernel.gradient(Vector::zero(), 0.0, 0.0), Vector::zero());
    }
}
