use crate::units::*;
use cgmath::prelude::*;

use super::particles::Particles;

/// Host side snapshot of a collider's transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColliderTransform {
    pub position: Point,
    pub right: Vector,
    pub up: Vector,
    pub lossy_scale: Vector, // world space scale; x spans right, y spans up
}

/// Static, double sided rectangle particles can't pass through.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collider {
    center: Point,
    right: Vector,
    up: Vector,
    normal: Vector,        // right × up
    half_extents: Extents, // along right and up
}

/// Result of a particle overlapping a collider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    pub depth: Real,       // negative, how far the particle reaches past the allowed distance
    pub push_dir: Vector, // ±normal, pointing from the plane to the particle's side
}

impl From<&ColliderTransform> for Collider {
    fn from(transform: &ColliderTransform) -> Self {
        Collider::new(
            transform.position,
            transform.right,
            transform.up,
            Extents::new(transform.lossy_scale.x * 0.5, transform.lossy_scale.y * 0.5),
        )
    }
}

impl Collider {
    /// `right` and `up` are normalized and expected to be orthogonal.
    pub fn new(center: Point, right: Vector, up: Vector, half_extents: Extents) -> Collider {
        let right = right.normalize();
        let up = up.normalize();
        Collider {
            center,
            right,
            up,
            normal: right.cross(up),
            half_extents,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }

    pub fn half_extents(&self) -> Extents {
        self.half_extents
    }

    /// Signed distance past the allowed distance `radius/2` from the plane. Negative means overlap.
    pub fn penetration_depth(&self, position: Point, radius: Real) -> Real {
        (self.center - position).dot(self.normal).abs() - radius * 0.5
    }

    pub fn intersect(&self, position: Point, radius: Real) -> Option<Penetration> {
        let to_center = self.center - position;
        let depth = to_center.dot(self.normal).abs() - radius * 0.5;

        let inside = depth < 0.0
            && to_center.dot(self.right).abs() < self.half_extents.x
            && to_center.dot(self.up).abs() < self.half_extents.y;
        if !inside {
            return None;
        }

        // Particles exactly on the plane are pushed against the normal.
        let push_dir = if to_center.dot(self.normal) >= 0.0 { -self.normal } else { self.normal };
        Some(Penetration { depth, push_dir })
    }

    /// Velocity after contact: normal part scaled by `boundary_damping`, tangential parts by `1 - drag`.
    pub fn damp_velocity(&self, velocity: Vector, penetration: &Penetration, drag: Real, boundary_damping: Real) -> Vector {
        let normal_speed = velocity.dot(penetration.push_dir);
        let tangential_factor = 1.0 - drag;

        penetration.push_dir * (normal_speed * boundary_damping)
            + self.right * (velocity.dot(self.right) * tangential_factor)
            + self.up * (velocity.dot(self.up) * tangential_factor)
    }

    /// Returns corrected position and velocity if the particle overlaps this collider.
    pub fn resolve(&self, position: Point, velocity: Vector, radius: Real, drag: Real, boundary_damping: Real) -> Option<(Point, Vector)> {
        self.intersect(position, radius).map(|penetration| {
            let velocity = self.damp_velocity(velocity, &penetration, drag, boundary_damping);
            let position = position - penetration.push_dir * penetration.depth;
            (position, velocity)
        })
    }
}

/// Tests every particle against every collider, in order.
///
/// Colliders are not resolved jointly: if two of them disagree, the one later in the list wins.
/// Returns the number of particle-collider contacts.
pub(super) fn resolve_collisions<H>(particles: &mut Particles<H>, colliders: &[Collider], radius: Real, drag: Real, boundary_damping: Real) -> usize {
    microprofile::scope!("Collider", "resolve_collisions");
    let mut num_contacts = 0;
    if colliders.is_empty() {
        return num_contacts;
    }

    for (position, velocity) in particles.positions.iter_mut().zip(particles.velocities.iter_mut()) {
        for collider in colliders {
            if let Some((p, v)) = collider.resolve(*position, *velocity, radius, drag, boundary_damping) {
                *position = p;
                *velocity = v;
                num_contacts += 1;
            }
        }
    }
    num_contacts
}
