//! Box-box narrowphase using the Separating Axis Theorem
//!
//! Candidate axes are the three face normals of each box plus the nine
//! pairwise cross products of those normals (edge-edge cases). The axis with
//! the smallest projected overlap becomes the contact normal.

use phantom_core::math::Vec3;

use crate::collision::CollisionInfo;
use crate::cuboid::Cuboid;
use crate::shape::Shape;

/// Axes shorter than this (squared) come from parallel edges and are skipped
const DEGENERATE_AXIS_SQ: f32 = 1e-12;

/// Test two boxes for overlap, filling `info` on a hit
///
/// `box_a`/`box_b` are the geometry of `a`/`b`; their corners must be current
/// (see [`Shape::sync_pose`]). Touching boxes count as colliding with depth 0.
pub fn detect_box_box(info: &mut CollisionInfo, a: &Shape, box_a: &Cuboid, b: &Shape, box_b: &Cuboid) -> bool {
    let pa = box_a.points();
    let pb = box_b.points();

    let mut axes = [Vec3::ZERO; 15];
    axes[0] = pa[0] - pa[1];
    axes[1] = pa[0] - pa[3];
    axes[2] = pa[0] - pa[4];
    axes[3] = pb[0] - pb[1];
    axes[4] = pb[0] - pb[3];
    axes[5] = pb[0] - pb[4];
    let mut next = 6;
    for j in 0..3 {
        for k in 3..6 {
            axes[next] = axes[j].cross(axes[k]);
            next += 1;
        }
    }

    let mut min_overlap = f32::INFINITY;
    let mut normal = None;

    for axis in axes {
        if axis.length_squared() <= DEGENERATE_AXIS_SQ {
            continue;
        }
        let axis = axis.normalize();
        let (min_a, max_a) = project(pa, axis);
        let (min_b, max_b) = project(pb, axis);

        if max_a < min_b || max_b < min_a {
            return false;
        }

        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap < min_overlap {
            min_overlap = overlap;
            normal = Some(axis);
        }
    }

    // Every candidate degenerate: only possible for collapsed boxes
    let Some(mut normal) = normal else {
        return false;
    };

    if (a.center - b.center).dot(normal) < 0.0 {
        normal = -normal;
    }

    info.reset();
    for &p in pa {
        if b.broadphase_contains(p) && b.contains_point(p) {
            info.add_contact_point(p);
        }
    }
    for &p in pb {
        if a.broadphase_contains(p) && a.contains_point(p) {
            info.add_contact_point(p);
        }
    }

    if info.num_points() > 0 {
        info.contact_point /= info.num_points() as f32;
    } else {
        // Edge-edge overlap: approximate with the midpoint of the centers
        info.contact_point = (a.center + b.center) * 0.5;
    }

    info.depth = min_overlap;
    info.normal = normal;
    true
}

fn project(points: &[Vec3; 8], axis: Vec3) -> (f32, f32) {
    points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
        let d = p.dot(axis);
        (min.min(d), max.max(d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::detect_collision;
    use phantom_core::math::Quat;
    use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

    fn cube(x: f32, y: f32, z: f32) -> Shape {
        cuboid(Vec3::new(x, y, z), Vec3::ONE)
    }

    fn cuboid(center: Vec3, half_extents: Vec3) -> Shape {
        Shape::new_box(1.0, half_extents).unwrap().with_center(center)
    }

    fn ground() -> Shape {
        cuboid(Vec3::new(0.0, -1.0, 0.0), Vec3::new(100.0, 1.0, 100.0))
    }

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_vec_close(actual: Vec3, expected: Vec3) {
        assert!((actual - expected).length() < 1e-3, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_no_overlap() {
        let a = cube(0.0, 0.0, 0.0);
        let b = cube(3.0, 0.0, 0.0);
        let mut info = CollisionInfo::new();
        assert!(!detect_collision(&mut info, &a, &b));
        assert_eq!(info, CollisionInfo::new());
    }

    #[test]
    fn test_separated_leaves_info_untouched() {
        let a = cube(0.0, 0.0, 0.0);
        let b = cube(0.0, 5.0, 0.0);
        let mut info = CollisionInfo::new();
        info.depth = 42.0;
        info.add_contact_point(Vec3::ONE);
        let before = info.clone();

        for _ in 0..3 {
            assert!(!detect_collision(&mut info, &a, &b));
        }
        assert_eq!(info, before);
        assert_eq!(a.center, Vec3::ZERO);
        assert_eq!(b.center, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_simple_overlap() {
        let a = cube(0.0, 0.0, 0.0);
        let b = cube(1.0, 0.0, 0.0);
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &a, &b));
        assert_eq!(info.depth, 1.0);
        assert_eq!(info.normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_touching_counts_as_collision() {
        let a = cube(0.0, 0.0, 0.0);
        let b = cube(2.0, 0.0, 0.0);
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &a, &b));
        assert_eq!(info.depth, 0.0);
    }

    #[test]
    fn test_box_against_log() {
        let block = cube(10.0, 1.0, 1.9);
        let log = cuboid(Vec3::new(0.0, 1.0, 0.0), Vec3::new(20.0, 1.0, 1.0));
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &block, &log));
        assert_close(info.depth, 0.1, 1e-4);
        assert_vec_close(info.normal, Vec3::Z);
        assert_eq!(info.num_points(), 4);
        assert_vec_close(info.contact_point, Vec3::new(10.0, 1.0, 0.9));
    }

    #[test]
    fn test_box_centered_on_ground() {
        let block = cube(0.0, 0.9, 0.0);
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &block, &ground()));
        assert_close(info.depth, 0.1, 1e-4);
        assert_vec_close(info.normal, Vec3::Y);
        assert_eq!(info.num_points(), 4);
        assert_vec_close(info.contact_point, Vec3::new(0.0, -0.1, 0.0));
    }

    #[test]
    fn test_box_offset_on_ground() {
        let block = cube(10.0, 0.9, 10.0);
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &block, &ground()));
        assert_close(info.depth, 0.1, 1e-4);
        assert_vec_close(info.normal, Vec3::Y);
        assert_vec_close(info.contact_point, Vec3::new(10.0, -0.1, 10.0));
    }

    #[test]
    fn test_normal_points_from_b_to_a() {
        let block = cube(0.0, 0.9, 0.0);
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &ground(), &block));
        assert_vec_close(info.normal, -Vec3::Y);
    }

    #[test]
    fn test_x_rotated_box_on_ground() {
        let block = cube(0.0, 1.4, 0.0).with_rotation(Quat::from_rotation_x(FRAC_PI_4));
        let lowest = 1.4 - std::f32::consts::SQRT_2;
        assert_close(block.aabb().min.y, lowest, 1e-4);

        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &block, &ground()));
        assert_close(info.depth, -lowest, 1e-4);
        assert_vec_close(info.normal, Vec3::Y);
        // The bottom edge: two corners
        assert_eq!(info.num_points(), 2);
    }

    #[test]
    fn test_x_and_z_rotated_box_on_ground() {
        let rotation = Quat::from_rotation_x(FRAC_PI_4) * Quat::from_rotation_z(FRAC_PI_4);
        let block = cube(0.0, 1.7, 0.0).with_rotation(rotation);
        assert_close(block.aabb().min.y, -0.007, 1e-3);

        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &block, &ground()));
        assert_close(info.depth, 0.007, 1e-3);
        assert_vec_close(info.normal, Vec3::Y);
    }

    #[test]
    fn test_offset_x_rotated_box_on_ground() {
        let block = cube(0.0, 1.3, 0.0).with_rotation(Quat::from_rotation_x(FRAC_PI_6));
        assert_close(block.aabb().min.y, -0.066, 1e-3);

        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &block, &ground()));
        assert_close(info.depth, 0.066, 1e-3);
        assert_vec_close(info.normal, Vec3::Y);
    }

    #[test]
    fn test_depth_tracks_lowest_corner() {
        let upright = cube(0.0, 0.9, 0.0);
        let tilted = cube(0.0, 0.9, 0.0).with_rotation(Quat::from_rotation_x(FRAC_PI_4));

        let mut upright_info = CollisionInfo::new();
        let mut tilted_info = CollisionInfo::new();
        assert!(detect_collision(&mut upright_info, &upright, &ground()));
        assert!(detect_collision(&mut tilted_info, &tilted, &ground()));

        // Lowest corner of the tilted cube sits at 0.9 - √2 rather than 0.9 - 1
        assert_close(upright_info.depth, 0.1, 1e-4);
        assert_close(tilted_info.depth, std::f32::consts::SQRT_2 - 0.9, 1e-4);

        // Raised so its lowest corner matches the upright cube, the tilted cube penetrates equally
        let raised = cube(0.0, 0.9 - 1.0 + std::f32::consts::SQRT_2, 0.0)
            .with_rotation(Quat::from_rotation_x(FRAC_PI_4));
        let mut raised_info = CollisionInfo::new();
        assert!(detect_collision(&mut raised_info, &raised, &ground()));
        assert_close(raised_info.depth, upright_info.depth, 1e-4);
    }

    #[test]
    fn test_edge_edge_falls_back_to_midpoint() {
        // Two long bars crossing edge to edge: no corner of either lies inside the other
        let a = cuboid(Vec3::new(0.0, 0.45, 0.0), Vec3::new(5.0, 0.5, 0.5))
            .with_rotation(Quat::from_rotation_x(FRAC_PI_4));
        let b = cuboid(Vec3::new(0.0, -0.45, 0.0), Vec3::new(0.5, 0.5, 5.0))
            .with_rotation(Quat::from_rotation_z(FRAC_PI_4));
        let mut info = CollisionInfo::new();
        assert!(detect_collision(&mut info, &a, &b));
        assert_eq!(info.num_points(), 0);
        assert_vec_close(info.contact_point, Vec3::ZERO);
        assert!(info.depth > 0.0);
        assert!(info.normal.y > 0.0);
    }
}
