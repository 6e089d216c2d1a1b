pub mod simulation_step;
pub mod smoothing_kernel;
pub mod spatial_hash;
