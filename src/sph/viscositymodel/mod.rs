pub use physical::PhysicalViscosityModel;

mod physical;

// ------------------------------------------------------

use crate::units::{Real, Vector};

pub trait ViscosityModel {
    // computes the viscous force neighbor j exerts on particle i
    // `velocitydiff`: vj - vi
    fn compute_viscous_force(&self, r_sq: Real, r: Real, massj: Real, rhoj: Real, velocitydiff: Vector) -> Vector;
}
