use crate::units::*;
use rand::Rng;

use super::error::ConfigurationError;

/// Initial particle layout: rows of `row_size` particles, `row_size` rows per layer, layers stacked along y.
///
/// x and z get uniform random jitter of up to ±`jitter` so the fluid doesn't start out as a perfect (unstable) lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSeeding {
    pub origin: Point,
    pub count: usize,
    pub row_size: usize,
    pub spacing: Real,       // distance between particles within a layer
    pub layer_spacing: Real, // vertical distance between layers
    pub jitter: Vector,      // per axis jitter bounds
}

impl Default for GridSeeding {
    fn default() -> Self {
        GridSeeding {
            origin: Point::new(0.0, 0.0, 0.0),
            count: 250,
            row_size: 16,
            spacing: 1.0,
            layer_spacing: 1.1,
            jitter: Vector::new(0.1, 0.0, 0.1),
        }
    }
}

impl GridSeeding {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.count == 0 {
            return Err(ConfigurationError::NoParticles);
        }
        if self.row_size == 0 {
            return Err(ConfigurationError::ZeroRowSize);
        }
        let values = [self.spacing, self.layer_spacing, self.jitter.x, self.jitter.y, self.jitter.z];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigurationError::NonFiniteParameter { name: "seeding" });
        }
        if let Some(&value) = [self.jitter.x, self.jitter.y, self.jitter.z].iter().find(|v| **v < 0.0) {
            return Err(ConfigurationError::NegativeParameter { name: "jitter", value });
        }
        Ok(())
    }

    fn jitter_sample(rng: &mut impl Rng, bound: Real) -> Real {
        if bound > 0.0 {
            rng.gen_range(-bound..=bound)
        } else {
            0.0
        }
    }

    pub fn positions(&self, rng: &mut impl Rng) -> Vec<Point> {
        let row_size = self.row_size.max(1);
        (0..self.count)
            .map(|i| {
                let row = i / row_size;
                let lattice = Vector::new(
                    (i % row_size) as Real * self.spacing,
                    (row / row_size) as Real * self.layer_spacing,
                    (row % row_size) as Real * self.spacing,
                );
                let jitter = Vector::new(
                    Self::jitter_sample(rng, self.jitter.x),
                    Self::jitter_sample(rng, self.jitter.y),
                    Self::jitter_sample(rng, self.jitter.z),
                );
                self.origin + lattice + jitter
            })
            .collect()
    }
}
