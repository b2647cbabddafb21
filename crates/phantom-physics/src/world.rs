//! Physics world
//!
//! Owns every live shape and drives them with a fixed-substep loop:
//! integrate awake shapes, refresh bounds, then sweep all pairs through the
//! broadphase, the SAT narrowphase and the resolver. Pairs are visited in
//! stable slot order and resolved immediately, so results are reproducible
//! for a given insertion history.

use phantom_core::math::Vec3;
use phantom_core::{Arena, FixedTimeStep, Handle};

use crate::collision::{detect_collision, CollisionInfo};
use crate::config::PhysicsConfig;
use crate::resolve::Resolver;
use crate::shape::Shape;
use crate::{PhysicsError, PhysicsResult};

/// A resolved collision, in the order it was processed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub a: Handle,
    pub b: Handle,
    /// Unit normal pointing from `b` toward `a`
    pub normal: Vec3,
    pub depth: f32,
    /// Averaged contact point
    pub point: Vec3,
}

/// Summary of one [`PhysicsWorld::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub substeps: u32,
    pub contacts: Vec<ContactEvent>,
}

/// Physics world
pub struct PhysicsWorld {
    config: PhysicsConfig,
    time_step: FixedTimeStep,
    resolver: Resolver,
    shapes: Arena<Shape>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub fn with_defaults() -> Self {
        Self::from_validated(PhysicsConfig::default())
    }

    fn from_validated(config: PhysicsConfig) -> Self {
        Self {
            time_step: config.time_step(),
            resolver: Resolver::new(config.min_normal_force),
            config,
            shapes: Arena::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Add a shape, refreshing its pose so its bounds are current
    pub fn insert(&mut self, mut shape: Shape) -> Handle {
        shape.sync_pose();
        let handle = self.shapes.insert(shape);
        log::trace!("inserted shape {}", handle);
        handle
    }

    pub fn remove(&mut self, handle: Handle) -> PhysicsResult<Shape> {
        self.shapes.remove(handle).ok_or(PhysicsError::StaleHandle(handle))
    }

    pub fn get(&self, handle: Handle) -> Option<&Shape> {
        self.shapes.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Shape> {
        self.shapes.get_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop every shape (level reload)
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Shape)> {
        self.shapes.iter()
    }

    /// Advance the simulation by a wall-clock frame of `dt` seconds
    pub fn step(&mut self, dt: f32) -> StepReport {
        let substeps = self.time_step.substeps_for(dt);
        let fixed_dt = self.time_step.step();
        let threshold = self.config.sleep_threshold;
        let gravity = self.config.gravity;
        let handles = self.shapes.handles();

        for (_, shape) in self.shapes.iter_mut() {
            if shape.always_awake {
                shape.wake();
            }
        }

        let mut report = StepReport {
            substeps,
            contacts: Vec::new(),
        };

        for _ in 0..substeps {
            for (_, shape) in self.shapes.iter_mut() {
                if shape.is_active(threshold) {
                    shape.integrate(fixed_dt, gravity);
                }
                shape.sync_pose();
            }

            self.sweep_pairs(&handles, &mut report);
        }

        let sleep_speed = self.config.sleep_speed;
        for (_, shape) in self.shapes.iter_mut() {
            if !shape.is_static() && shape.linear_speed() < sleep_speed && shape.angular_speed() < sleep_speed {
                shape.sleep_count = shape.sleep_count.saturating_add(1);
            }
        }

        log::debug!(
            "physics step: dt={:.4}s substeps={} shapes={} contacts={}",
            dt,
            substeps,
            handles.len(),
            report.contacts.len()
        );
        report
    }

    fn sweep_pairs(&mut self, handles: &[Handle], report: &mut StepReport) {
        let threshold = self.config.sleep_threshold;

        for (i, &ha) in handles.iter().enumerate() {
            for &hb in &handles[i + 1..] {
                let Some((a, b)) = self.shapes.get2_mut(ha, hb) else {
                    continue;
                };
                if a.noclip || b.noclip {
                    continue;
                }
                let a_awake = !a.is_static() && !a.is_asleep(threshold);
                let b_awake = !b.is_static() && !b.is_asleep(threshold);
                if !a_awake && !b_awake {
                    continue;
                }
                if !a.broadphase_intersects(b) {
                    continue;
                }

                let mut info = CollisionInfo::new();
                if !detect_collision(&mut info, a, b) {
                    continue;
                }

                self.resolver.resolve(a, b, &info);

                if self.config.wake_on_contact {
                    if !a.is_static() {
                        a.wake();
                    }
                    if !b.is_static() {
                        b.wake();
                    }
                }

                log::trace!(
                    "contact {} / {}: depth={:.4} normal={} points={}",
                    ha,
                    hb,
                    info.depth,
                    info.normal,
                    info.num_points()
                );
                report.contacts.push(ContactEvent {
                    a: ha,
                    b: hb,
                    normal: info.normal,
                    depth: info.depth,
                    point: info.contact_point,
                });
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_defaults()
    }
}
