//! Configuration system for the STEPPE simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::animal::AnimalParams;
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub prey: SpeciesConfig,
    pub predator: SpeciesConfig,
    pub grass: GrassConfig,
    pub logging: LoggingConfig,
}

/// World/environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Use filtered (flee/chase) movement policies instead of random walks
    pub smart_movement: bool,
}

/// Per-species configuration, one block each for prey and predators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Number of animals at start
    pub initial_count: usize,
    /// Per-tick probability of producing offspring
    pub reproduction_probability: f32,
    /// Energy gained per successful feed
    pub energy_from_food: f32,
    /// Energy paid per tick for moving
    pub movement_cost: f32,
    /// Fraction of parent energy transferred to offspring, in (0, 1)
    pub reproduction_energy_share: f32,
}

/// Grass layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrassConfig {
    /// Whether the grass layer exists at all
    pub enabled: bool,
    /// Ticks between depletion and regrowth
    pub regrowth_time: u64,
}

/// Logging and snapshot-recording configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between recorded history snapshots
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            prey: SpeciesConfig::default_prey(),
            predator: SpeciesConfig::default_predator(),
            grass: GrassConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            smart_movement: false,
        }
    }
}

impl SpeciesConfig {
    pub fn default_prey() -> Self {
        Self {
            initial_count: 140,
            reproduction_probability: 0.04,
            energy_from_food: 4.0,
            movement_cost: 1.0,
            reproduction_energy_share: 0.5,
        }
    }

    pub fn default_predator() -> Self {
        Self {
            initial_count: 40,
            reproduction_probability: 0.05,
            energy_from_food: 20.0,
            movement_cost: 1.0,
            reproduction_energy_share: 0.5,
        }
    }

    /// Behavioral parameters handed to each animal of this species.
    pub fn params(&self, smart_movement: bool) -> AnimalParams {
        AnimalParams {
            reproduction_probability: self.reproduction_probability,
            energy_from_food: self.energy_from_food,
            movement_cost: self.movement_cost,
            reproduction_energy_share: self.reproduction_energy_share,
            smart_movement,
        }
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.reproduction_probability) {
            return Err(SimError::invalid_argument(format!(
                "{}.reproduction_probability must be within [0, 1]",
                name
            )));
        }
        if self.reproduction_energy_share <= 0.0 || self.reproduction_energy_share >= 1.0 {
            return Err(SimError::invalid_argument(format!(
                "{}.reproduction_energy_share must be within (0, 1)",
                name
            )));
        }
        if self.movement_cost < 0.0 {
            return Err(SimError::invalid_argument(format!(
                "{}.movement_cost must be non-negative",
                name
            )));
        }
        if self.energy_from_food < 0.0 {
            return Err(SimError::invalid_argument(format!(
                "{}.energy_from_food must be non-negative",
                name
            )));
        }
        Ok(())
    }
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            regrowth_time: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 50,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values, failing fast before any simulation
    /// state is built.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(SimError::invalid_argument(
                "grid dimensions must be at least 1x1",
            ));
        }
        self.prey.validate("prey")?;
        self.predator.validate("predator")?;
        if self.grass.regrowth_time == 0 {
            return Err(SimError::invalid_argument(
                "grass.regrowth_time must be at least 1 tick",
            ));
        }
        if self.logging.stats_interval == 0 {
            return Err(SimError::invalid_argument(
                "logging.stats_interval must be at least 1 tick",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.width, loaded.world.width);
        assert_eq!(config.prey.initial_count, loaded.prey.initial_count);
        assert_eq!(config.grass.regrowth_time, loaded.grass.regrowth_time);
    }

    #[test]
    fn test_rejects_degenerate_share() {
        let mut config = Config::default();
        config.prey.reproduction_energy_share = 1.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidArgument(_))
        ));

        config.prey.reproduction_energy_share = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_probability_and_regrowth() {
        let mut config = Config::default();
        config.predator.reproduction_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grass.regrowth_time = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.width = 0;
        assert!(config.validate().is_err());
    }
}
