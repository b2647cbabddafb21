//! Contact resolution
//!
//! Separates a colliding pair positionally, then applies one linear and
//! angular impulse per contact point plus a friction impulse. Velocity
//! changes from all contact points are accumulated and written back once,
//! so the order of contact points does not bias the result.

use phantom_core::math::{Mat3, Vec3};

use crate::collision::CollisionInfo;
use crate::shape::Shape;

/// Sequential-impulse contact solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    /// Baseline normal force so friction does not vanish on light contacts
    pub min_normal_force: f32,
    /// Tangential speed below which friction is skipped
    pub friction_epsilon: f32,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            min_normal_force: 9.8,
            friction_epsilon: 1e-6,
        }
    }
}

/// Velocities being built up across the contact points of one pair
struct NextVelocities {
    linear_a: Vec3,
    linear_b: Vec3,
    angular_a: Vec3,
    angular_b: Vec3,
}

impl Resolver {
    pub fn new(min_normal_force: f32) -> Self {
        Self {
            min_normal_force,
            ..Self::default()
        }
    }

    /// Resolve a detected collision between `a` and `b`
    pub fn resolve(&self, a: &mut Shape, b: &mut Shape, info: &CollisionInfo) {
        let total_inv_mass = a.inv_mass() + b.inv_mass();
        if total_inv_mass <= 0.0 {
            return;
        }

        let normal = info.normal;
        let move_a = a.inv_mass() / total_inv_mass;
        let move_b = b.inv_mass() / total_inv_mass;

        a.center += normal * (info.depth * move_a);
        a.sync_pose();
        b.center += normal * (-info.depth * move_b);
        b.sync_pose();

        let mut next = NextVelocities {
            linear_a: a.velocity,
            linear_b: b.velocity,
            angular_a: a.angular_velocity,
            angular_b: b.angular_velocity,
        };
        let inv_inertia_a = a.world_inv_inertia();
        let inv_inertia_b = b.world_inv_inertia();

        for &point in &info.contacts {
            self.solve_contact(a, b, info, point, &inv_inertia_a, &inv_inertia_b, &mut next);
        }

        a.velocity = next.linear_a;
        b.velocity = next.linear_b;
        a.angular_velocity = next.angular_a;
        b.angular_velocity = next.angular_b;
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_contact(
        &self,
        a: &Shape,
        b: &Shape,
        info: &CollisionInfo,
        point: Vec3,
        inv_inertia_a: &Mat3,
        inv_inertia_b: &Mat3,
        next: &mut NextVelocities,
    ) {
        let normal = info.normal;
        let ra = point - a.center;
        let rb = point - b.center;

        let relative_velocity =
            (b.velocity + b.angular_velocity.cross(rb)) - (a.velocity + a.angular_velocity.cross(ra));
        let normal_speed = relative_velocity.dot(normal);

        // Already separating
        if normal_speed < 0.0 {
            return;
        }

        let ra_n = ra.cross(normal);
        let rb_n = rb.cross(normal);
        let angular_a = (*inv_inertia_a * ra_n).dot(ra_n);
        let angular_b = (*inv_inertia_b * rb_n).dot(rb_n);

        let restitution = a.restitution.min(b.restitution);
        let j = -(1.0 + restitution) * normal_speed / (a.inv_mass() + b.inv_mass() + angular_a + angular_b);
        let impulse = normal * j;

        next.linear_a -= impulse * a.inv_mass();
        next.linear_b += impulse * b.inv_mass();
        next.angular_a += *inv_inertia_a * ra.cross(impulse);
        next.angular_b -= *inv_inertia_b * rb.cross(impulse);

        let tangent_velocity = relative_velocity - normal * normal_speed;
        let tangent_speed = tangent_velocity.length();
        if tangent_speed <= self.friction_epsilon {
            return;
        }

        let tangent_direction = tangent_velocity / tangent_speed;
        let coefficient = a.coefficient_of_friction.min(b.coefficient_of_friction);
        let normal_force = (j.abs() / info.num_points() as f32).max(self.min_normal_force);
        let magnitude = (coefficient * normal_force).min(tangent_speed);
        let friction = tangent_direction * -magnitude;

        add_friction(&mut next.linear_a, friction, a.inv_mass());
        add_friction(&mut next.linear_b, friction, -b.inv_mass());
        add_friction(&mut next.angular_a, *inv_inertia_a * ra.cross(friction), 1.0);
        add_friction(&mut next.angular_b, *inv_inertia_b * rb.cross(friction), -1.0);
    }
}

/// Resolve a collision with the default solver settings
pub fn resolve(a: &mut Shape, b: &mut Shape, info: &CollisionInfo) {
    Resolver::default().resolve(a, b, info);
}

/// Damp `velocity` by `delta * scale`, one axis at a time
///
/// Each component only ever shrinks towards zero: the delta is turned to
/// oppose the current component and clamped so it cannot overshoot.
pub(crate) fn add_friction(velocity: &mut Vec3, delta: Vec3, scale: f32) {
    for axis in 0..3 {
        let current = velocity[axis];
        let mut axis_delta = delta[axis] * scale;
        if sign(current) != sign(axis_delta) {
            axis_delta = -axis_delta;
        }
        if current.abs() < axis_delta.abs() {
            axis_delta = current;
        }
        velocity[axis] -= axis_delta;
    }
}

/// Sign with zero mapped to zero (both signed zeros)
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::detect_collision;
    use crate::shape::STATIC_MASS;
    use phantom_core::math::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn unit_box(center: Vec3) -> Shape {
        Shape::new_box(1.0, Vec3::ONE).unwrap().with_center(center)
    }

    fn ground() -> Shape {
        Shape::new_box(STATIC_MASS, Vec3::new(100.0, 1.0, 100.0))
            .unwrap()
            .with_center(Vec3::new(0.0, -1.0, 0.0))
    }

    fn collide(a: &Shape, b: &Shape) -> CollisionInfo {
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, a, b));
        info
    }

    #[test]
    fn test_box_and_ground() {
        let mut block = unit_box(Vec3::new(0.0, 0.9, 0.0));
        let mut floor = ground();
        let info = collide(&block, &floor);
        assert!((info.depth - 0.1).abs() < 1e-4);

        resolve(&mut block, &mut floor, &info);

        assert!((block.center.y - 1.0).abs() < 1e-4);
        assert!(block.velocity.y.abs() < 1e-4);
        assert_eq!(floor.center, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(floor.velocity, Vec3::ZERO);
        assert_eq!(floor.angular_velocity, Vec3::ZERO);
        // Bounds follow the corrected position
        assert!((block.aabb().min.y).abs() < 1e-4);
    }

    #[test]
    fn test_falling_box_is_slowed() {
        let mut block = unit_box(Vec3::new(0.0, 0.9, 0.0)).with_velocity(Vec3::new(0.0, -1.0, 0.0));
        let mut floor = ground();
        let info = collide(&block, &floor);

        resolve(&mut block, &mut floor, &info);

        assert!(block.velocity.y > -1.0);
        assert!(block.velocity.y < 0.0);
        assert!(block.angular_velocity.length() < 1e-4);
    }

    #[test]
    fn test_separating_contact_gets_no_impulse() {
        let mut block = unit_box(Vec3::new(0.0, 0.9, 0.0)).with_velocity(Vec3::new(0.0, 5.0, 0.0));
        let mut floor = ground();
        let info = collide(&block, &floor);

        resolve(&mut block, &mut floor, &info);

        assert_eq!(block.velocity, Vec3::new(0.0, 5.0, 0.0));
        assert!((block.center.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_spinning_box_loses_angular_speed() {
        let mut block = unit_box(Vec3::new(0.0, 0.9, 0.0)).with_angular_velocity(Vec3::new(0.0, 1.0, 0.0));
        let mut floor = ground();
        let info = collide(&block, &floor);

        resolve(&mut block, &mut floor, &info);

        assert!((block.center.y - 1.0).abs() < 1e-4);
        assert!(block.velocity.y.abs() < 1e-4);
        assert!(block.angular_velocity.y >= 0.0);
        assert!(block.angular_velocity.y < 1.0);
    }

    #[test]
    fn test_spin_decays_without_reversing() {
        let mut block = unit_box(Vec3::new(0.0, 0.95, 0.0))
            .with_angular_velocity(Vec3::new(0.0, 3.0, 0.0))
            .with_friction(0.002);
        let mut floor = ground();

        let mut previous = block.angular_velocity.y;
        for _ in 0..20 {
            // Keep the box pressed into the floor
            block.center.y = 0.95;
            block.sync_pose();
            let info = collide(&block, &floor);
            resolve(&mut block, &mut floor, &info);

            let spin = block.angular_velocity.y;
            assert!(spin >= 0.0, "spin reversed: {spin}");
            assert!(spin <= previous);
            previous = spin;
        }
        assert!(previous < 3.0);
    }

    #[test]
    fn test_sliding_box_slows_in_direction_of_travel() {
        let mut block = unit_box(Vec3::new(0.0, 0.9, 0.0)).with_velocity(Vec3::new(2.0, 0.0, 0.0));
        let mut floor = ground();
        let info = collide(&block, &floor);

        resolve(&mut block, &mut floor, &info);

        assert!(block.velocity.x > 0.0);
        assert!(block.velocity.x < 2.0);
        assert_eq!(floor.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_correction_split_by_inverse_mass() {
        let mut a = unit_box(Vec3::ZERO);
        let mut b = unit_box(Vec3::new(1.5, 0.0, 0.0));
        let info = collide(&a, &b);
        assert!((info.depth - 0.5).abs() < 1e-5);

        resolve(&mut a, &mut b, &info);

        assert!((a.center.x + 0.25).abs() < 1e-5);
        assert!((b.center.x - 1.75).abs() < 1e-5);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let mut light = unit_box(Vec3::ZERO);
        let mut heavy = Shape::new_box(3.0, Vec3::ONE).unwrap().with_center(Vec3::new(1.0, 0.0, 0.0));
        let info = collide(&light, &heavy);

        resolve(&mut light, &mut heavy, &info);

        // inv masses 1 and 1/3: the light box takes three quarters of the unit overlap
        assert!((light.center.x + 0.75).abs() < 1e-5);
        assert!((heavy.center.x - 1.25).abs() < 1e-5);
    }

    #[test]
    fn test_angular_impulse_uses_world_inertia() {
        // Long axis (local X) stood upright along world Y
        let mut post = Shape::new_box(1.0, Vec3::new(2.0, 1.0, 1.0))
            .unwrap()
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2))
            .with_velocity(Vec3::new(0.0, -1.0, 0.0));
        let mut floor = ground();

        // A single contact on the bottom face, offset along Z
        let mut info = CollisionInfo::new();
        info.normal = Vec3::Y;
        info.add_contact_point(Vec3::new(0.0, -2.0, 1.0));

        resolve(&mut post, &mut floor, &info);

        // About world X the post has the local Y inverse inertia 12 / (4 + 1) = 2.4
        // (the local X entry would be 6). With r × n = (-1, 0, 0), j = -1.01 / (1 + 2.4)
        let j = -1.01 / 3.4;
        assert!((post.velocity.y - (-1.0 - j)).abs() < 1e-5);
        assert!((post.angular_velocity.x - 2.4 * -j).abs() < 1e-4);
        assert!(post.angular_velocity.y.abs() < 1e-4);
        assert!(post.angular_velocity.z.abs() < 1e-4);
        assert_eq!(floor.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_two_static_bodies_untouched() {
        let mut a = ground();
        let mut b = ground();
        let info = collide(&a, &b);

        resolve(&mut a, &mut b, &info);

        assert_eq!(a.center, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(b.center, Vec3::new(0.0, -1.0, 0.0));
        assert!(a.velocity.is_finite() && b.velocity.is_finite());
    }

    #[test]
    fn test_add_friction_only_damps() {
        let mut v = Vec3::new(0.5, -0.5, 0.0);
        add_friction(&mut v, Vec3::new(-0.2, -0.2, 0.3), 1.0);
        assert!((v.x - 0.3).abs() < 1e-6);
        assert!((v.y + 0.3).abs() < 1e-6);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_add_friction_clamps_at_zero() {
        let mut v = Vec3::new(0.1, -0.1, 2.0);
        add_friction(&mut v, Vec3::splat(1.0), 1.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, 1.0);

        // Negative scale behaves the same way
        let mut w = Vec3::new(0.1, 0.0, -2.0);
        add_friction(&mut w, Vec3::splat(0.5), -2.0);
        assert_eq!(w.x, 0.0);
        assert_eq!(w.z, -1.0);
    }
}
