use super::error::ConfigurationError;
use crate::units::*;

/// Fixed settings of a fluid simulation.
///
/// Defaults are tuned for a small, fast-reacting blob of fluid with unit-sized particles.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    pub particle_radius: Real,    // used for collisions only, particles are points otherwise
    pub smoothing_radius: Real,   // typically expressed as 'h'
    pub rest_density: Real,       // ρ0, pressure is zero at this density
    pub gravity_multiplier: Real, // gravity force is scaled by local density and this factor
    pub particle_mass: Real,
    pub viscosity: Real,        // μ
    pub drag: Real,             // fraction of tangential velocity lost on collider contact
    pub timestep: Real,         // dt used by fixed stepping
    pub gravity: Vector,        // in m/s²
    pub boundary_damping: Real, // scales normal velocity on collider contact. Negative to bounce.
    pub gas_constant: Real,     // k in the ideal gas equation of state
    pub cell_size: Real,        // edge length of a spatial hash cell, ideally ≈ smoothing_radius
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            particle_radius: 1.0,
            smoothing_radius: 1.0,
            rest_density: 15.0,
            gravity_multiplier: 2000.0,
            particle_mass: 0.1,
            viscosity: 1.0,
            drag: 0.025,
            timestep: 0.0008,
            gravity: Vector::new(0.0, -9.81, 0.0),
            boundary_damping: -0.5,
            gas_constant: 2000.0,
            cell_size: 1.0,
        }
    }
}

impl SimulationParameters {
    /// Sets smoothing radius and keeps the spatial hash cells equally sized.
    pub fn with_smoothing_radius(mut self, smoothing_radius: Real) -> Self {
        self.smoothing_radius = smoothing_radius;
        self.cell_size = smoothing_radius;
        self
    }

    pub fn smoothing_radius_sq(&self) -> Real {
        self.smoothing_radius * self.smoothing_radius
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let scalars = [
            ("particle_radius", self.particle_radius),
            ("smoothing_radius", self.smoothing_radius),
            ("rest_density", self.rest_density),
            ("gravity_multiplier", self.gravity_multiplier),
            ("particle_mass", self.particle_mass),
            ("viscosity", self.viscosity),
            ("drag", self.drag),
            ("timestep", self.timestep),
            ("gravity", self.gravity.x + self.gravity.y + self.gravity.z),
            ("boundary_damping", self.boundary_damping),
            ("gas_constant", self.gas_constant),
            ("cell_size", self.cell_size),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigurationError::NonFiniteParameter { name });
        }

        if self.smoothing_radius <= 0.0 {
            return Err(ConfigurationError::NonPositiveSmoothingRadius(self.smoothing_radius));
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigurationError::NonPositiveCellSize(self.cell_size));
        }
        if self.timestep <= 0.0 {
            return Err(ConfigurationError::NonPositiveTimestep(self.timestep));
        }
        let non_negative = [
            ("particle_radius", self.particle_radius),
            ("particle_mass", self.particle_mass),
            ("rest_density", self.rest_density),
            ("viscosity", self.viscosity),
            ("gas_constant", self.gas_constant),
        ];
        if let Some(&(name, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigurationError::NegativeParameter { name, value });
        }
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(ConfigurationError::DragOutOfRange(self.drag));
        }
        // Flips the normal velocity on contact, so it has to be negative (or zero).
        if self.boundary_damping > 0.0 {
            return Err(ConfigurationError::PositiveBoundaryDamping(self.boundary_damping));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimulationParameters::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_smoothing_radius() {
        let parameters = SimulationParameters {
            smoothing_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(parameters.validate(), Err(ConfigurationError::NonPositiveSmoothingRadius(0.0)));
    }

    #[test]
    fn rejects_negative_mass() {
        let parameters = SimulationParameters {
            particle_mass: -1.0,
            ..Default::default()
        };
        assert_eq!(
            parameters.validate(),
            Err(ConfigurationError::NegativeParameter {
                name: "particle_mass",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_nan() {
        let parameters = SimulationParameters {
            gravity: Vector::new(0.0, Real::NAN, 0.0),
            ..Default::default()
        };
        assert_eq!(parameters.validate(), Err(ConfigurationError::NonFiniteParameter { name: "gravity" }));
    }

    #[test]
    fn rejects_drag_above_one() {
        let parameters = SimulationParameters {
            drag: 1.5,
            ..Default::default()
        };
        assert_eq!(parameters.validate(), Err(ConfigurationError::DragOutOfRange(1.5)));
    }

    #[test]
    fn rejects_positive_boundary_damping() {
        let parameters = SimulationParameters {
            boundary_damping: 0.5,
            ..Default::default()
        };
        assert_eq!(parameters.validate(), Err(ConfigurationError::PositiveBoundaryDamping(0.5)));
        let sticky = SimulationParameters {
            boundary_damping: 0.0,
            ..Default::default()
        };
        assert_eq!(sticky.validate(), Ok(()));
    }

    #[test]
    fn smoothing_radius_builder_moves_cell_size() {
        let parameters = SimulationParameters::default().with_smoothing_radius(1.2);
        assert_eq!(parameters.cell_size, 1.2);
        assert!((parameters.smoothing_radius_sq() - 1.44).abs() < 1e-6);
    }
}
