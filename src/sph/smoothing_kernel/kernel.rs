use crate::units::{Real, Vector};

/// SPH smoothing kernel
///
/// Only radially symmetric kernels are supported.
/// All kernels have compact support within the smoothing length h and return zero for |r|>=h.
pub trait Kernel {
    /// Evaluates the kernel function for a given square of distance r_sq
    /// `r_sq`:     Squared length of ri_to_rj
    /// `r`:        Length of ri_to_rj
    fn evaluate(&self, r_sq: Real, r: Real) -> Real;

    /// Evaluates the gradient of the kernel with respect to ri, i.e. ∇W(ri - rj).
    /// `ri_to_rj`: Vector from a position i to a position j, so rj - ri. Not normalized!
    /// `r_sq`:     Squared length of ri_to_rj
    /// `r`:        Length of ri_to_rj
    fn gradient(&self, ri_to_rj: Vector, r_sq: Real, r: Real) -> Vector;

    /// Evaluates the laplacian of the kernel, i.e. the second derivative.
    /// `r_sq`:     Squared length of ri_to_rj
    /// `r`:        Length of ri_to_rj
    fn laplacian(&self, r_sq: Real, r: Real) -> Real;
}
