/// Smoothing Kernels.
pub use self::kernel::Kernel;
pub use self::poly6::Poly6;
pub use self::spiky::Spiky;
pub use self::viscosity::Viscosity;

// Properties every kernel needs to fulfill: normalization, compact support and a gradient/laplacian consistent with evaluate.
macro_rules! generate_kernel_tests {
    ($kernel_type:ident) => {
    };
}

mod kernel;
mod poly6;
mod spiky;
mod viscosity;
