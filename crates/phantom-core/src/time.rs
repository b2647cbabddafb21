//! Time Management
//!
//! Time-step model for the physics core:
//! - Wall-clock frame delta from the host
//! - Fixed-rate substeps derived from that delta, capped for hitches
//! - Stopwatch for measuring host-side work

use std::time::{Duration, Instant};

/// Delta time wrapper for type safety
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaTime(pub f64);

impl DeltaTime {
    /// Create a new delta time from seconds
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Get the delta time in seconds
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Get the delta time in milliseconds
    pub fn as_millis(&self) -> f64 {
        self.0 * 1000.0
    }

    /// Get the delta time as f32 (what the simulation consumes)
    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32
    }
}

impl Default for DeltaTime {
    fn default() -> Self {
        Self(1.0 / 60.0)
    }
}

impl From<Duration> for DeltaTime {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs_f64())
    }
}

/// Fixed substep schedule
///
/// A frame of length `dt` is split into `round(rate_hz * dt)` substeps of
/// `1 / rate_hz` seconds each, clamped to `1..=max_substeps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimeStep {
    /// Substep rate in Hz
    pub rate_hz: f32,
    /// Maximum number of substeps per frame (to prevent spiral of death)
    pub max_substeps: u32,
}

impl Default for FixedTimeStep {
    fn default() -> Self {
        Self {
            rate_hz: 600.0,
            max_substeps: 20,
        }
    }
}

impl FixedTimeStep {
    /// Create a new fixed time step with the given frequency
    pub fn from_hz(rate_hz: f32) -> Self {
        Self {
            rate_hz,
            ..Self::default()
        }
    }

    /// Set the maximum number of substeps per frame
    pub fn with_max_substeps(mut self, max: u32) -> Self {
        self.max_substeps = max;
        self
    }

    /// Length of one substep in seconds
    pub fn step(&self) -> f32 {
        1.0 / self.rate_hz
    }

    /// Number of substeps to run for a frame of `dt` seconds
    pub fn substeps_for(&self, dt: f32) -> u32 {
        let max = self.max_substeps.max(1);
        let wanted = (self.rate_hz * dt).round();
        if wanted.is_nan() || wanted < 1.0 {
            return 1;
        }
        if wanted > max as f32 {
            log::warn!("frame of {:.4}s wants {} substeps, clamping to {}", dt, wanted, max);
            return max;
        }
        wanted as u32
    }
}

/// Stopwatch for measuring elapsed time
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start: Instant,
    elapsed: Duration,
    running: bool,
}

impl Stopwatch {
    /// Create and start a new stopwatch
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Duration::ZERO,
            running: true,
        }
    }

    /// Start or resume the stopwatch
    pub fn start(&mut self) {
        if !self.running {
            self.start = Instant::now();
            self.running = true;
        }
    }

    /// Stop the stopwatch
    pub fn stop(&mut self) {
        if self.running {
            self.elapsed += self.start.elapsed();
            self.running = false;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        if self.running {
            self.elapsed + self.start.elapsed()
        } else {
            self.elapsed
        }
    }

    /// Check if the stopwatch is running
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
