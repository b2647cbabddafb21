//! # Phantom Core
//!
//! Foundation types shared by the Phantom physics core and its hosts.
//!
//! This crate provides:
//! - **Math**: glam re-exports and axis-aligned bounds
//! - **Arena**: Generation-checked handles for owned object registries
//! - **Time**: Frame delta wrapper and fixed-substep scheduling

pub mod arena;
pub mod math;
pub mod time;

pub use arena::{Arena, Handle};
pub use math::Aabb;
pub use time::{DeltaTime, FixedTimeStep, Stopwatch};
