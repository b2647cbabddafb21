//! Oriented box geometry

use phantom_core::math::{Aabb, Mat3, Mat4, Vec3};

/// Unit cube corner signs
///
/// Corners 0-1, 0-3 and 0-4 span the local X, Y and Z edges respectively;
/// the SAT detector derives face axes from exactly those pairs.
pub const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

/// Box geometry: local half-extents plus cached world-space corners
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    half_extents: Vec3,
    points: [Vec3; 8],
}

impl Cuboid {
    /// Create a box with the given local half-widths
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            points: CUBE_CORNERS.map(|corner| corner * half_extents),
        }
    }

    /// Local half-widths
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub(crate) fn set_half_extents(&mut self, half_extents: Vec3) {
        self.half_extents = half_extents;
    }

    /// World-space corners as of the last bounds update
    pub fn points(&self) -> &[Vec3; 8] {
        &self.points
    }

    /// Diagonal local inverse inertia of a solid box of the given mass
    pub fn local_inv_inertia(&self, mass: f32) -> Mat3 {
        let h = self.half_extents * self.half_extents;
        Mat3::from_diagonal(Vec3::new(
            12.0 / (mass * (h.y + h.z)),
            12.0 / (mass * (h.x + h.z)),
            12.0 / (mass * (h.x + h.y)),
        ))
    }

    /// Recompute world corners from `transform` and return their bounds seeded by `center`
    pub(crate) fn update_points(&mut self, transform: &Mat4, center: Vec3) -> Aabb {
        let mut aabb = Aabb::from_point(center);
        for (point, corner) in self.points.iter_mut().zip(CUBE_CORNERS) {
            *point = transform.transform_point3(corner * self.half_extents);
            aabb.expand_to_include(*point);
        }
        aabb
    }

    /// Whether a point already in box-local space lies inside (boundary inclusive)
    pub fn contains_local(&self, local: Vec3) -> bool {
        local.abs().cmple(self.half_extents).all()
    }
}
