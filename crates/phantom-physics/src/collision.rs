//! Collision info and narrowphase dispatch

use phantom_core::math::Vec3;
use smallvec::SmallVec;

use crate::sat::detect_box_box;
use crate::shape::{Shape, ShapeKind};

/// Contact capacity for a single pair test
pub const MAX_COLLISION_CONTACTS: usize = 16;

/// Result of a pair test, consumed immediately by the resolver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionInfo {
    /// Penetration along `normal`
    pub depth: f32,
    /// Unit normal pointing from B toward A
    pub normal: Vec3,
    /// Average of all contact points (or the midpoint of the centers when there are none)
    pub contact_point: Vec3,
    pub contacts: SmallVec<[Vec3; MAX_COLLISION_CONTACTS]>,
}

impl CollisionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.depth = 0.0;
        self.normal = Vec3::ZERO;
        self.contact_point = Vec3::ZERO;
        self.contacts.clear();
    }

    pub fn num_points(&self) -> usize {
        self.contacts.len()
    }

    /// Record a contact point, accumulating it into `contact_point`
    ///
    /// Points beyond [`MAX_COLLISION_CONTACTS`] indicate degenerate geometry:
    /// fatal in debug builds, dropped with a warning otherwise.
    pub fn add_contact_point(&mut self, point: Vec3) {
        debug_assert!(
            self.contacts.len() < MAX_COLLISION_CONTACTS,
            "too many contact points"
        );
        if self.contacts.len() >= MAX_COLLISION_CONTACTS {
            log::warn!("contact capacity {} exceeded, dropping {}", MAX_COLLISION_CONTACTS, point);
            return;
        }
        self.contact_point += point;
        self.contacts.push(point);
    }
}

/// Narrowphase test between two shapes
///
/// Returns false without touching `info` when the shapes are apart. Pairs
/// involving a sphere are not supported and always report no collision.
pub fn detect_collision(info: &mut CollisionInfo, a: &Shape, b: &Shape) -> bool {
    match (a.kind(), b.kind()) {
        (ShapeKind::Box(box_a), ShapeKind::Box(box_b)) => detect_box_box(info, a, box_a, b, box_b),
        _ => false,
    }
}

/// Distance along the segment `start..end` to where it first enters the sphere
///
/// Returns `None` when the line misses the sphere or every hit lies outside
/// `[0, |end - start|)`.
pub fn line_intersect_sphere(center: Vec3, radius: f32, start: Vec3, end: Vec3) -> Option<f32> {
    let q = start - center;
    let delta = end - start;
    let max = delta.length();
    if max <= 0.0 {
        return None;
    }
    let u = delta / max;

    let b = 2.0 * u.dot(q);
    let c = q.length_squared() - radius * radius;
    let d = b * b - 4.0 * c;
    if d < 0.0 {
        return None;
    }

    let sqrt_d = d.sqrt();
    let t1 = (-b + sqrt_d) * 0.5;
    let t2 = (-b - sqrt_d) * 0.5;
    let in_range = |t: f32| (0.0..max).contains(&t);
    if in_range(t1) || in_range(t2) {
        Some(t1.min(t2))
    } else {
        None
    }
}
