pub use muller::{pressure_force, MullerSolver};

mod muller;

// ------------------------------------------------------

use crate::units::Real;

// Densities are clamped to this before dividing by them.
// Happens for zero mass particles, can't happen otherwise since the self-contribution is always part of the density.
pub const MIN_DENSITY: Real = 1.0e-6;

/// Locally recovered numerical problems of a single integration.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationStatistics {
    pub clamped_densities: usize,   // particles whose density was below MIN_DENSITY
    pub recovered_particles: usize, // particles reset to rest after producing non-finite state
}
