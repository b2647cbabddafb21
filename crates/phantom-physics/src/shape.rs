//! Rigid body state
//!
//! A [`Shape`] carries pose, velocity, mass properties and cached transforms
//! for one body. Geometry is a closed [`ShapeKind`] variant so collision
//! dispatch is a plain `match`.

use phantom_core::math::{Aabb, Mat3, Mat4, Quat, Vec3, EPSILON};

use crate::cuboid::Cuboid;
use crate::sphere::Sphere;
use crate::{PhysicsError, PhysicsResult};

/// Mass at or above which a shape is immovable
pub const STATIC_MASS: f32 = 10000.0;

/// Mostly inelastic by default
pub const DEFAULT_RESTITUTION: f32 = 0.01;

pub const DEFAULT_COEFFICIENT_OF_FRICTION: f32 = 0.01;

/// Substep length used by [`Shape::update`]
pub const DEFAULT_SUBSTEP: f32 = 1.0 / 60.0 / 10.0;

/// Gravity used by [`Shape::update`]
pub const DEFAULT_GRAVITY: f32 = 60.0;

/// Concrete geometry of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Box(Cuboid),
    Sphere(Sphere),
}

/// Rigid body
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    is_static: bool,
    mass: f32,
    inv_mass: f32,
    /// Local-space inverse inertia (diagonal)
    inv_inertia: Mat3,
    transform: Mat4,
    inverse_transform: Mat4,
    aabb: Aabb,

    /// World-space centroid
    pub center: Vec3,
    /// Orientation, kept unit length by integration
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub restitution: f32,
    pub coefficient_of_friction: f32,
    /// Excluded from integration and collision
    pub noclip: bool,
    /// Consecutive frames of near-zero motion
    pub sleep_count: u32,
    /// Sleep counter is reset at the start of every world step
    pub always_awake: bool,
}

impl Shape {
    /// Create a box with the given mass and local half-extents
    pub fn new_box(mass: f32, half_extents: Vec3) -> PhysicsResult<Self> {
        check_half_extents(half_extents)?;
        Self::new(mass, ShapeKind::Box(Cuboid::new(half_extents)))
    }

    /// Create a sphere with the given mass and radius
    pub fn new_sphere(mass: f32, radius: f32) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidDimensions(format!("sphere radius {}", radius)));
        }
        Self::new(mass, ShapeKind::Sphere(Sphere::new(radius)))
    }

    fn new(mass: f32, kind: ShapeKind) -> PhysicsResult<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }

        let is_static = mass >= STATIC_MASS;
        let mut shape = Self {
            kind,
            is_static,
            mass,
            inv_mass: if is_static { 0.0 } else { 1.0 / mass },
            inv_inertia: Mat3::ZERO,
            transform: Mat4::IDENTITY,
            inverse_transform: Mat4::IDENTITY,
            aabb: Aabb::default(),
            center: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            restitution: DEFAULT_RESTITUTION,
            coefficient_of_friction: DEFAULT_COEFFICIENT_OF_FRICTION,
            noclip: false,
            sleep_count: 0,
            always_awake: false,
        };
        shape.refresh_inv_inertia();
        shape.sync_pose();
        Ok(shape)
    }

    /// Move the shape to `center` and refresh its pose
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self.sync_pose();
        self
    }

    /// Set the orientation and refresh the pose
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self.sync_pose();
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, coefficient: f32) -> Self {
        self.coefficient_of_friction = coefficient;
        self
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Box geometry, if this shape is a box
    pub fn as_box(&self) -> Option<&Cuboid> {
        match &self.kind {
            ShapeKind::Box(cuboid) => Some(cuboid),
            ShapeKind::Sphere(_) => None,
        }
    }

    /// Resize a box, recomputing its inertia and bounds
    pub fn set_half_extents(&mut self, half_extents: Vec3) -> PhysicsResult<()> {
        check_half_extents(half_extents)?;
        match &mut self.kind {
            ShapeKind::Box(cuboid) => cuboid.set_half_extents(half_extents),
            ShapeKind::Sphere(_) => {
                return Err(PhysicsError::InvalidDimensions("sphere has no half-extents".into()));
            }
        }
        self.refresh_inv_inertia();
        self.update_bounds();
        Ok(())
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Local-space inverse inertia tensor
    pub fn inv_inertia(&self) -> Mat3 {
        self.inv_inertia
    }

    /// Inverse inertia rotated into world space: `R * I⁻¹ * Rᵀ`
    pub fn world_inv_inertia(&self) -> Mat3 {
        let r = Mat3::from_quat(self.rotation);
        r * self.inv_inertia * r.transpose()
    }

    /// Local-to-world transform as of the last [`Shape::setup_transform_matrix`]
    pub fn transform_matrix(&self) -> &Mat4 {
        &self.transform
    }

    pub fn inverse_transform_matrix(&self) -> &Mat4 {
        &self.inverse_transform
    }

    /// Transform for a child visual: this shape's transform, then translate, then scale
    pub fn attached_transform(&self, offset: Vec3, scale: Vec3) -> Mat4 {
        self.transform * Mat4::from_translation(offset) * Mat4::from_scale(scale)
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn linear_speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn angular_speed(&self) -> f32 {
        self.angular_velocity.length()
    }

    /// Whether the sleep counter has reached `threshold`
    pub fn is_asleep(&self, threshold: u32) -> bool {
        self.sleep_count >= threshold
    }

    /// Dynamic, collidable and below the sleep threshold
    pub fn is_active(&self, threshold: u32) -> bool {
        !self.noclip && !self.is_static && !self.is_asleep(threshold)
    }

    pub fn wake(&mut self) {
        self.sleep_count = 0;
    }

    /// Advance one substep with the default step length and gravity
    pub fn update(&mut self) {
        self.integrate(DEFAULT_SUBSTEP, DEFAULT_GRAVITY);
    }

    /// Advance one substep of `dt` seconds (symplectic Euler, exponential-map rotation)
    ///
    /// `angular_velocity` is world-space, so the delta rotation is applied on the left.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if !self.is_static {
            self.velocity.y -= dt * gravity;
        }

        self.center += self.velocity * dt;

        // Skipped entirely at negligible speed so normalization never sees a zero axis
        let speed = self.angular_velocity.length();
        if speed > EPSILON {
            let half_angle = 0.5 * speed * dt;
            let axis = self.angular_velocity / speed * half_angle.sin();
            let delta = Quat::from_xyzw(axis.x, axis.y, axis.z, half_angle.cos());
            self.rotation = (delta * self.rotation).normalize();
        }
    }

    /// Rebuild the transform and its inverse from `center` and `rotation`
    pub fn setup_transform_matrix(&mut self) {
        self.transform = Mat4::from_rotation_translation(self.rotation, self.center);
        let inv_rotation = self.rotation.conjugate();
        self.inverse_transform = Mat4::from_rotation_translation(inv_rotation, inv_rotation * -self.center);
    }

    /// Recompute world-space geometry and bounds from the cached transform
    pub fn update_bounds(&mut self) {
        self.aabb = match &mut self.kind {
            ShapeKind::Box(cuboid) => cuboid.update_points(&self.transform, self.center),
            ShapeKind::Sphere(sphere) => sphere.bounds(self.center),
        };
    }

    /// Refresh transform then bounds, in that order
    pub fn sync_pose(&mut self) {
        self.setup_transform_matrix();
        self.update_bounds();
    }

    /// Exact containment test in the shape's local space
    pub fn contains_point(&self, point: Vec3) -> bool {
        match &self.kind {
            ShapeKind::Box(cuboid) => cuboid.contains_local(self.inverse_transform.transform_point3(point)),
            ShapeKind::Sphere(sphere) => sphere.contains(self.center, point),
        }
    }

    pub fn broadphase_intersects(&self, other: &Shape) -> bool {
        self.aabb.intersects(&other.aabb)
    }

    pub fn broadphase_contains(&self, point: Vec3) -> bool {
        self.aabb.contains_point(point)
    }

    fn refresh_inv_inertia(&mut self) {
        self.inv_inertia = if self.is_static {
            Mat3::ZERO
        } else {
            match &self.kind {
                ShapeKind::Box(cuboid) => cuboid.local_inv_inertia(self.mass),
                ShapeKind::Sphere(sphere) => sphere.local_inv_inertia(self.mass),
            }
        };
    }
}

fn check_half_extents(half_extents: Vec3) -> PhysicsResult<()> {
    if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
        return Err(PhysicsError::InvalidDimensions(format!("box half-extents {}", half_extents)));
    }
    Ok(())
}
