//! # STEPPE
//!
//! Discrete-time predator-prey ecosystem simulator on a toroidal grid.
//!
//! ## Features
//!
//! - **Toroidal grid**: 4-connected neighborhoods with wrap-around edges
//! - **Two mobile kinds**: prey and predators with energy, feeding,
//!   reproduction and death
//! - **Scheduled regrowth**: depleted grass patches regrow via a
//!   discrete-event queue
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: seeded random number generation, fully deterministic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use steppe::{Config, World};
//!
//! // Create world with default config
//! let config = Config::default();
//! let mut world = World::new(config).unwrap();
//!
//! // Run simulation
//! world.run(1000).unwrap();
//!
//! // Check results
//! println!("Prey: {}", world.prey_count());
//! println!("Predators: {}", world.predator_count());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use steppe::Config;
//!
//! let mut config = Config::default();
//! config.grass.enabled = true;
//! config.world.smart_movement = true;
//! ```

pub mod animal;
pub mod config;
pub mod error;
pub mod grid;
pub mod scheduler;
pub mod stats;
pub mod world;

// Re-export main types
pub use config::Config;
pub use error::SimError;
pub use stats::Snapshot;
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(steps: u64, prey: usize, predators: usize) -> Result<BenchmarkResult, SimError> {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.width = 50;
    config.world.height = 50;
    config.prey.initial_count = prey;
    config.predator.initial_count = predators;
    config.grass.enabled = true;

    let mut world = World::new(config)?;

    let start = Instant::now();
    world.run(steps)?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        steps,
        initial_population: prey + predators,
        final_prey: world.prey_count(),
        final_predators: world.predator_count(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: steps as f64 / elapsed.as_secs_f64(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub initial_population: usize,
    pub final_prey: usize,
    pub final_predators: usize,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(
            f,
            "Population: {} -> {} prey + {} predators",
            self.initial_population, self.final_prey, self.final_predators
        )?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        Ok(())
    }
}
