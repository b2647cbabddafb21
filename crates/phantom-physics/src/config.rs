//! Physics world configuration

use phantom_core::FixedTimeStep;
use serde::{Deserialize, Serialize};

use crate::{PhysicsError, PhysicsResult};

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration along -Y in units/s²
    pub gravity: f32,
    /// Substep rate in Hz
    pub substep_hz: f32,
    /// Maximum substeps run for a single frame
    pub max_substeps: u32,
    /// Frames of near-zero motion after which a shape sleeps
    pub sleep_threshold: u32,
    /// Linear and angular speed below which a frame counts towards sleep
    pub sleep_speed: f32,
    /// Baseline normal force used by friction on light contacts
    pub min_normal_force: f32,
    /// Wake sleeping dynamic shapes when a contact is resolved against them
    pub wake_on_contact: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 60.0,
            substep_hz: 600.0,
            max_substeps: 20,
            sleep_threshold: 100,
            sleep_speed: 0.5,
            min_normal_force: 9.8,
            wake_on_contact: false,
        }
    }
}

impl PhysicsConfig {
    /// Check every field for a usable value
    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite and non-negative, got {}",
                self.gravity
            )));
        }
        if !self.substep_hz.is_finite() || self.substep_hz <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "substep_hz must be positive, got {}",
                self.substep_hz
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        if !self.sleep_speed.is_finite() || self.sleep_speed < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "sleep_speed must be non-negative, got {}",
                self.sleep_speed
            )));
        }
        if !self.min_normal_force.is_finite() || self.min_normal_force < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "min_normal_force must be non-negative, got {}",
                self.min_normal_force
            )));
        }
        Ok(())
    }

    /// Substep schedule derived from this configuration
    pub fn time_step(&self) -> FixedTimeStep {
        FixedTimeStep::from_hz(self.substep_hz).with_max_substeps(self.max_substeps)
    }
}
