use std::fmt;

use super::spatial_hash::ParticleIndex;
use crate::units::Real;

/// Invalid setup detected before the first simulation step.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    NonPositiveSmoothingRadius(Real),
    NonPositiveCellSize(Real),
    NonPositiveTimestep(Real),
    NegativeParameter { name: &'static str, value: Real },
    NonFiniteParameter { name: &'static str },
    DragOutOfRange(Real),
    PositiveBoundaryDamping(Real),
    NoParticles,
    ZeroRowSize,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::NonPositiveSmoothingRadius(h) => write!(f, "smoothing radius must be positive, got {}", h),
            ConfigurationError::NonPositiveCellSize(size) => write!(f, "spatial hash cell size must be positive, got {}", size),
            ConfigurationError::NonPositiveTimestep(dt) => write!(f, "timestep must be positive, got {}", dt),
            ConfigurationError::NegativeParameter { name, value } => write!(f, "{} must not be negative, got {}", name, value),
            ConfigurationError::NonFiniteParameter { name } => write!(f, "{} must be finite", name),
            ConfigurationError::DragOutOfRange(drag) => write!(f, "drag must be within [0, 1], got {}", drag),
            ConfigurationError::PositiveBoundaryDamping(damping) => write!(f, "boundary damping must not be positive, got {}", damping),
            ConfigurationError::NoParticles => write!(f, "simulation needs at least one particle"),
            ConfigurationError::ZeroRowSize => write!(f, "seeding row size must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialHashError {
    AlreadyInserted(ParticleIndex),
}

impl fmt::Display for SpatialHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialHashError::AlreadyInserted(pidx) => write!(f, "particle {} is already in the spatial hash", pidx),
        }
    }
}

impl std::error::Error for SpatialHashError {}
