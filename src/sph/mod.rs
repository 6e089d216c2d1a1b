pub use self::collider::{Collider, ColliderTransform, Penetration};
pub use self::error::{ConfigurationError, SpatialHashError};
pub use self::parameters::SimulationParameters;
pub use self::particles::{Particle, Particles};
pub use self::seeding::GridSeeding;
pub use self::simulation::{Simulation, StepStatistics};
pub use self::solver::*;
pub use self::timemanager::{TimeManager, TimeManagerConfiguration};
pub use self::viscositymodel::*;

mod collider;
mod error;
mod parameters;
mod particles;
mod seeding;
mod simulation;
pub mod smoothing_kernel;
mod solver;
pub mod spatial_hash;
mod timemanager;
mod viscositymodel;
