//! STEPPE - CLI Entry Point
//!
//! Discrete-time predator-prey ecosystem simulator.

use clap::{Parser, Subcommand};
use steppe::{benchmark, Config, World};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "steppe")]
#[command(version)]
#[command(about = "Discrete-time predator-prey ecosystem simulator on a toroidal grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10000")]
        steps: u64,

        /// Output directory for the snapshot history
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Enable the grass layer regardless of the config file
        #[arg(long)]
        grass: bool,

        /// Enable smart movement regardless of the config file
        #[arg(long)]
        smart: bool,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Initial prey count
        #[arg(long, default_value = "1000")]
        prey: usize,

        /// Initial predator count
        #[arg(long, default_value = "300")]
        predators: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            steps,
            output,
            seed,
            grass,
            smart,
            quiet,
        } => run_simulation(config, steps, output, seed, grass, smart, quiet),

        Commands::Benchmark {
            steps,
            prey,
            predators,
        } => run_benchmark(steps, prey, predators),

        Commands::Init { output } => generate_config(output),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_simulation(
    config_path: PathBuf,
    steps: u64,
    output: PathBuf,
    seed: Option<u64>,
    grass: bool,
    smart: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let mut config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };
    if grass {
        config.grass.enabled = true;
    }
    if smart {
        config.world.smart_movement = true;
    }

    init_logging(&config.logging.log_level);

    // Create output directory
    std::fs::create_dir_all(&output)?;

    // Create world
    let mut world = if let Some(s) = seed {
        println!("Using seed: {}", s);
        World::new_with_seed(config.clone(), s)?
    } else {
        World::new(config.clone())?
    };

    println!("Starting simulation");
    println!("  Prey: {}", world.prey_count());
    println!("  Predators: {}", world.predator_count());
    println!(
        "  Grid: {}x{} (grass {})",
        config.world.width,
        config.world.height,
        if config.grass.enabled { "on" } else { "off" }
    );
    println!("  Steps: {}", steps);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    for i in 0..steps {
        world.step()?;

        // Progress output
        if !quiet && i % stats_interval == 0 {
            println!("{}", world.snapshot.summary());
        }

        // Extinction is a valid steady state; nothing further will happen
        if world.is_extinct() {
            println!("\nPopulation extinct at tick {}", world.time);
            break;
        }
    }

    let elapsed = start.elapsed();
    let steps_per_sec = world.time as f64 / elapsed.as_secs_f64();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Ticks: {}", world.time);
    println!("Speed: {:.1} steps/s", steps_per_sec);
    println!("Final prey: {}", world.prey_count());
    println!("Final predators: {}", world.predator_count());

    // Save snapshot history
    let history_path = output.join("snapshot_history.json");
    world.history.save(&history_path.to_string_lossy())?;
    println!("Snapshot history: {:?}", history_path);

    Ok(())
}

fn run_benchmark(
    steps: u64,
    prey: usize,
    predators: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    init_logging("warn");

    println!("=== STEPPE Benchmark ===");
    println!("Steps: {}", steps);
    println!("Prey: {} / Predators: {}", prey, predators);
    println!();

    let result = benchmark(steps, prey, predators)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");

    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
