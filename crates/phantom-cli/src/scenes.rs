//! Built-in demo scenes
//!
//! Every scene sits on the same static ground slab whose top face is y = 0.

use clap::ValueEnum;
use phantom_core::math::{Quat, Vec3};
use phantom_physics::{PhysicsResult, PhysicsWorld, Shape, STATIC_MASS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// A single box dropped from height
    Drop,
    /// Three boxes dropped onto each other
    Stack,
    /// A tilted box spinning as it lands
    Spin,
    /// A box sliding across the ground
    Slide,
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Drop => "drop",
            Scene::Stack => "stack",
            Scene::Spin => "spin",
            Scene::Slide => "slide",
        }
    }

    /// Populate `world` with this scene's bodies, labelled for reporting
    pub fn populate(&self, world: &mut PhysicsWorld) -> PhysicsResult<Vec<String>> {
        let mut labels = Vec::new();
        world.insert(
            Shape::new_box(STATIC_MASS, Vec3::new(100.0, 1.0, 100.0))?.with_center(Vec3::new(0.0, -1.0, 0.0)),
        );
        labels.push("ground".to_string());

        match self {
            Scene::Drop => {
                world.insert(Shape::new_box(1.0, Vec3::ONE)?.with_center(Vec3::new(0.0, 5.0, 0.0)));
                labels.push("box".to_string());
            }
            Scene::Stack => {
                for level in 0..3 {
                    let y = 1.5 + level as f32 * 2.5;
                    world.insert(Shape::new_box(1.0, Vec3::ONE)?.with_center(Vec3::new(0.0, y, 0.0)));
                    labels.push(format!("box{}", level));
                }
            }
            Scene::Spin => {
                let shape = Shape::new_box(2.0, Vec3::new(1.0, 0.5, 1.5))?
                    .with_center(Vec3::new(0.0, 4.0, 0.0))
                    .with_rotation(Quat::from_rotation_x(0.4) * Quat::from_rotation_z(0.25))
                    .with_angular_velocity(Vec3::new(0.0, 6.0, 0.0))
                    .with_friction(0.05);
                world.insert(shape);
                labels.push("spinner".to_string());
            }
            Scene::Slide => {
                let shape = Shape::new_box(1.0, Vec3::ONE)?
                    .with_center(Vec3::new(0.0, 1.0, 0.0))
                    .with_velocity(Vec3::new(8.0, 0.0, 0.0))
                    .with_friction(0.02);
                world.insert(shape);
                labels.push("slider".to_string());
            }
        }

        Ok(labels)
    }
}
