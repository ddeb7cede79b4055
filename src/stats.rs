//! Per-tick snapshots for the external collector.

use crate::animal::{Animal, Species};
use crate::grid::GrassField;
use serde::{Deserialize, Serialize};

/// Energy distribution summary for one species.
///
/// All fields are 0 for an empty population; `std_dev` is the sample
/// standard deviation and is 0 for fewer than two animals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub mean: f32,
    pub median: f32,
    pub min: f32,
    pub max: f32,
    pub std_dev: f32,
}

impl EnergySummary {
    /// Summarize a set of energy values.
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len();
        let mean = values.iter().sum::<f32>() / n as f32;

        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f32::total_cmp);
        let mid = n / 2;
        let median = if n % 2 != 0 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };

        let std_dev = if n > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / (n - 1) as f32;
            var.sqrt()
        } else {
            0.0
        };

        Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[n - 1],
            std_dev,
        }
    }
}

/// Read-only view of simulation state after one tick.
///
/// Pure queries over current state; capturing a snapshot never mutates the
/// world.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulation time at capture
    pub time: u64,
    /// Living prey count
    pub prey: usize,
    /// Living predator count
    pub predators: usize,
    /// Grown grass patches (0 when grass is disabled)
    pub grass_grown: usize,
    /// Prey energy distribution
    pub prey_energy: EnergySummary,
    /// Predator energy distribution
    pub predator_energy: EnergySummary,
    /// Predator-to-prey ratio (0 when there are no prey)
    pub predator_prey_ratio: f32,
}

impl Snapshot {
    /// Capture a snapshot of the current population and grass state.
    pub fn capture(time: u64, animals: &[Animal], grass: &GrassField) -> Self {
        let prey_energy: Vec<f32> = animals
            .iter()
            .filter(|a| a.is_alive() && a.species == Species::Prey)
            .map(|a| a.energy)
            .collect();
        let predator_energy: Vec<f32> = animals
            .iter()
            .filter(|a| a.is_alive() && a.species == Species::Predator)
            .map(|a| a.energy)
            .collect();

        let prey = prey_energy.len();
        let predators = predator_energy.len();
        let predator_prey_ratio = if prey > 0 {
            predators as f32 / prey as f32
        } else {
            0.0
        };

        Self {
            time,
            prey,
            predators,
            grass_grown: grass.grown_count(),
            prey_energy: EnergySummary::from_values(&prey_energy),
            predator_energy: EnergySummary::from_values(&predator_energy),
            predator_prey_ratio,
        }
    }

    /// Format as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Prey:{:5} | Pred:{:4} | Grass:{:5} | E(prey):{:.1} | E(pred):{:.1} | Ratio:{:.2}",
            self.time,
            self.prey,
            self.predators,
            self.grass_grown,
            self.prey_energy.mean,
            self.predator_energy.mean,
            self.predator_prey_ratio,
        )
    }
}

/// Historical snapshot tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotHistory {
    /// All recorded snapshots
    pub snapshots: Vec<Snapshot>,
    /// Recording interval in ticks
    pub interval: u64,
}

impl SnapshotHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a snapshot
    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Population counts over time as (time, prey, predators)
    pub fn population_series(&self) -> Vec<(u64, usize, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.prey, s.predators))
            .collect()
    }

    /// Grown grass over time
    pub fn grass_series(&self) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.grass_grown))
            .collect()
    }

    /// Save history to a JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
