//! # Phantom Physics
//!
//! Real-time rigid-body physics for oriented boxes.
//!
//! ## Features
//! - Rigid body state with symplectic substep integration
//! - Oriented box geometry with cached world-space corners and bounds
//! - Separating Axis Theorem box-box detection (15 axes)
//! - Sequential-impulse resolution with Coulomb-style friction
//! - Fixed-substep world driver with broadphase and sleeping
//!
//! Sphere shapes exist for bounds and containment queries; collision
//! against them is not implemented and always reports no contact.

pub mod collision;
pub mod config;
pub mod cuboid;
pub mod resolve;
pub mod sat;
pub mod shape;
pub mod sphere;
pub mod world;

pub use collision::{detect_collision, line_intersect_sphere, CollisionInfo, MAX_COLLISION_CONTACTS};
pub use config::PhysicsConfig;
pub use cuboid::Cuboid;
pub use resolve::{resolve, Resolver};
pub use sat::detect_box_box;
pub use shape::{Shape, ShapeKind, DEFAULT_COEFFICIENT_OF_FRICTION, DEFAULT_RESTITUTION, STATIC_MASS};
pub use sphere::Sphere;
pub use world::{ContactEvent, PhysicsWorld, StepReport};

pub use phantom_core::{Aabb, Handle};

use thiserror::Error;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("Invalid mass: {0}")]
    InvalidMass(f32),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Stale or unknown shape handle: {0}")]
    StaleHandle(Handle),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type PhysicsResult<T> = Result<T, PhysicsError>;
