//! # Phantom CLI
//!
//! Headless host for the Phantom physics core.
//!
//! ## Commands
//! - `simulate` - Run a built-in scene and print the final body states
//! - `config` - Print the default physics configuration as JSON

pub mod scenes;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phantom_core::math::Vec3;
use phantom_core::{DeltaTime, Stopwatch};
use phantom_physics::{PhysicsConfig, PhysicsWorld};
use serde::Serialize;

pub use scenes::Scene;

/// Phantom physics CLI
#[derive(Parser)]
#[command(name = "phantom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a scene for a number of frames
    Simulate {
        /// Scene to load
        #[arg(short, long, value_enum, default_value = "drop")]
        scene: Scene,

        /// Frames to simulate
        #[arg(short, long, default_value = "300")]
        frames: u32,

        /// Frame length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// Physics configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default physics configuration
    Config,
}

/// Final state of one body
#[derive(Debug, Clone, Serialize)]
pub struct BodySummary {
    pub label: String,
    pub center: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub is_static: bool,
    pub asleep: bool,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub scene: String,
    pub frames: u32,
    pub substeps: u64,
    pub contacts: u64,
    pub elapsed_ms: f64,
    pub bodies: Vec<BodySummary>,
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "scene '{}': {} frames, {} substeps, {} contacts in {:.2}ms",
            self.scene, self.frames, self.substeps, self.contacts, self.elapsed_ms
        )?;
        for body in &self.bodies {
            let state = if body.is_static {
                "static"
            } else if body.asleep {
                "asleep"
            } else {
                "awake"
            };
            writeln!(
                f,
                "  {:<8} {:<6} center=({:.3}, {:.3}, {:.3}) velocity=({:.3}, {:.3}, {:.3}) spin={:.3}",
                body.label,
                state,
                body.center.x,
                body.center.y,
                body.center.z,
                body.velocity.x,
                body.velocity.y,
                body.velocity.z,
                body.angular_velocity.length()
            )?;
        }
        Ok(())
    }
}

/// Load a physics configuration, falling back to defaults for missing fields
pub fn load_config(path: &Path) -> Result<PhysicsConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PhysicsConfig =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Build `scene`, step it `frames` times and summarise the result
pub fn run_simulation(scene: Scene, frames: u32, dt: DeltaTime, config: PhysicsConfig) -> Result<SimulationSummary> {
    let mut world = PhysicsWorld::new(config).context("Invalid physics configuration")?;
    let labels = scene.populate(&mut world)?;

    log::info!("Simulating '{}' for {} frames at {:.2}ms", scene.name(), frames, dt.as_millis());

    let mut stopwatch = Stopwatch::new();
    let mut substeps = 0u64;
    let mut contacts = 0u64;
    for _ in 0..frames {
        let report = world.step(dt.as_secs_f32());
        substeps += u64::from(report.substeps);
        contacts += report.contacts.len() as u64;
    }
    stopwatch.stop();

    let threshold = world.config().sleep_threshold;
    let bodies = world
        .iter()
        .zip(labels)
        .map(|((_, shape), label)| BodySummary {
            label,
            center: shape.center,
            velocity: shape.velocity,
            angular_velocity: shape.angular_velocity,
            is_static: shape.is_static(),
            asleep: shape.is_asleep(threshold),
        })
        .collect();

    Ok(SimulationSummary {
        scene: scene.name().to_string(),
        frames,
        substeps,
        contacts,
        elapsed_ms: DeltaTime::from(stopwatch.elapsed()).as_millis(),
        bodies,
    })
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match cli.command {
        Commands::Simulate {
            scene,
            frames,
            dt,
            config,
            json,
        } => {
            let config = match config {
                Some(path) => {
                    log::info!("Loading config from {}", path.display());
                    load_config(&path)?
                }
                None => PhysicsConfig::default(),
            };
            let summary = run_simulation(scene, frames, DeltaTime::from_secs(dt), config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&PhysicsConfig::default())?);
        }
    }

    Ok(())
}
