//! Sphere geometry
//!
//! Only bounds and containment are supported; no collision routine accepts spheres yet.

use phantom_core::math::{Aabb, Mat3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Diagonal local inverse inertia of a solid sphere
    pub fn local_inv_inertia(&self, mass: f32) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(5.0 / (2.0 * mass * self.radius * self.radius)))
    }

    pub fn bounds(&self, center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(self.radius))
    }

    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        center.distance_squared(point) <= self.radius * self.radius
    }
}
