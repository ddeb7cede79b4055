//! World simulation engine - main simulation loop.

use crate::animal::{Animal, AnimalId, Species};
use crate::config::Config;
use crate::error::SimError;
use crate::grid::{CellId, GrassField, Grid};
use crate::scheduler::{Event, Scheduler};
use crate::stats::{Snapshot, SnapshotHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The simulation world.
///
/// Owns the animal arena, the grid, the grass layer, the event scheduler
/// and the seeded random number generator; all mutation flows through
/// [`World::step`]. Execution is single-threaded and turn-based: within a
/// tick all prey step before all predators, each in the arena order
/// captured at the start of the tick.
pub struct World {
    // Environment
    pub grid: Grid,
    pub grass: GrassField,

    // Population arena; the grid stores indices into this vector
    pub animals: Vec<Animal>,

    // Pending delayed transitions (grass regrowth)
    pub scheduler: Scheduler,

    // Monotonic tick counter
    pub time: u64,

    // Configuration
    pub config: Config,

    // Latest per-tick snapshot and recorded history
    pub snapshot: Snapshot,
    pub history: SnapshotHistory,

    // ID generation
    next_animal_id: u64,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration and an entropy seed.
    pub fn new(config: Config) -> Result<Self, SimError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility.
    ///
    /// Initialization draw order is fixed: one cell draw and one energy
    /// draw per prey, the same per predator, then per grass cell one
    /// grown flip and, for depleted cells, one countdown draw.
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(config.world.width, config.world.height);
        let cells = grid.cell_count();

        let mut grass = if config.grass.enabled {
            GrassField::sown(cells, config.grass.regrowth_time)
        } else {
            GrassField::bare(cells, config.grass.regrowth_time)
        };
        let mut scheduler = Scheduler::new();

        // Seed the population: all prey, then all predators. Initial energy
        // is uniform in [0, 2 * energy_from_food).
        let mut animals = Vec::new();
        let mut next_animal_id = 0u64;
        for (species, species_cfg) in [
            (Species::Prey, &config.prey),
            (Species::Predator, &config.predator),
        ] {
            let params = species_cfg.params(config.world.smart_movement);
            for _ in 0..species_cfg.initial_count {
                let cell = grid.random_cell(&mut rng);
                let energy = if species_cfg.energy_from_food > 0.0 {
                    rng.gen_range(0.0..2.0 * species_cfg.energy_from_food)
                } else {
                    0.0
                };

                let idx = animals.len();
                animals.push(Animal::new(next_animal_id, species, cell, energy, params));
                grid.insert(cell, idx);
                next_animal_id += 1;
            }
        }

        // Seed the grass layer: each patch grown with probability 0.5;
        // depleted patches get a regrowth event at a randomized countdown
        // so regrowth is desynchronized across the grid at start.
        if config.grass.enabled {
            for cell in 0..cells {
                if rng.gen::<f32>() < 0.5 {
                    grass.regrow(cell)?;
                } else {
                    let countdown = rng.gen_range(1..=config.grass.regrowth_time);
                    scheduler.schedule_at(countdown, Event::RegrowGrass { cell });
                }
            }
        }

        let snapshot = Snapshot::capture(0, &animals, &grass);
        let mut history = SnapshotHistory::new(config.logging.stats_interval);
        history.record(snapshot.clone());

        Ok(Self {
            grid,
            grass,
            animals,
            scheduler,
            time: 0,
            config,
            snapshot,
            history,
            next_animal_id,
            rng,
            seed,
        })
    }

    /// Advance the simulation by one tick.
    ///
    /// Per-tick ordering: fire all events due at the current tick, step all
    /// prey, step all predators, increment the clock, sweep the dead, then
    /// capture the snapshot for the external collector.
    pub fn step(&mut self) -> Result<(), SimError> {
        for event in self.scheduler.advance_to(self.time) {
            self.apply_event(event)?;
        }

        // Population order is captured here; animals born during this tick
        // get later arena slots and never act before the next tick.
        let prey_order = self.species_order(Species::Prey);
        let predator_order = self.species_order(Species::Predator);

        for idx in prey_order {
            self.step_animal(idx)?;
        }
        for idx in predator_order {
            self.step_animal(idx)?;
        }

        self.time += 1;
        self.sweep_dead();

        let was_populated = self.snapshot.prey + self.snapshot.predators > 0;
        self.snapshot = Snapshot::capture(self.time, &self.animals, &self.grass);
        if was_populated && self.snapshot.prey + self.snapshot.predators == 0 {
            log::info!("population extinct at tick {}", self.time);
        }

        if self.time % self.history.interval == 0 {
            self.history.record(self.snapshot.clone());
        }

        Ok(())
    }

    /// Run the simulation for the given number of ticks.
    pub fn run(&mut self, steps: u64) -> Result<(), SimError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Run with a callback invoked after every tick.
    pub fn run_with_callback<F>(&mut self, steps: u64, mut callback: F) -> Result<(), SimError>
    where
        F: FnMut(&World, u64),
    {
        for i in 0..steps {
            self.step()?;
            callback(self, i);
        }
        Ok(())
    }

    fn species_order(&self, species: Species) -> Vec<AnimalId> {
        (0..self.animals.len())
            .filter(|&i| self.animals[i].is_alive() && self.animals[i].species == species)
            .collect()
    }

    /// One animal's turn: move, pay the movement cost, feed, die if out of
    /// energy, otherwise draw for reproduction.
    fn step_animal(&mut self, idx: AnimalId) -> Result<(), SimError> {
        // Eaten earlier this tick
        if !self.animals[idx].is_alive() {
            return Ok(());
        }

        let from = self.animals[idx].cell;
        let dest = self.choose_destination(idx);
        if dest != from {
            self.grid.relocate(idx, from, dest)?;
            self.animals[idx].cell = dest;
        }

        let cost = self.animals[idx].params.movement_cost;
        self.animals[idx].energy -= cost;

        match self.animals[idx].species {
            Species::Prey => self.graze(idx),
            Species::Predator => self.hunt(idx)?,
        }

        if self.animals[idx].energy <= 0.0 {
            self.kill_animal(idx)?;
            return Ok(());
        }

        let p = self.animals[idx].params.reproduction_probability;
        if self.rng.gen::<f32>() < p {
            self.spawn_offspring(idx);
        }

        Ok(())
    }

    /// Pick a destination under the animal's movement policy. Total: always
    /// yields a cell, falling back to the current one where no neighbor
    /// qualifies.
    fn choose_destination(&mut self, idx: AnimalId) -> CellId {
        let cell = self.animals[idx].cell;
        let species = self.animals[idx].species;

        if !self.animals[idx].params.smart_movement {
            return self.grid.random_neighbor(cell, &mut self.rng);
        }

        let neighbors = self.grid.neighbors(cell);
        match species {
            // Flee: avoid cells holding predators, prefer grown grass among
            // the safe ones, stay put when every neighbor is dangerous.
            Species::Prey => {
                let safe: Vec<CellId> = neighbors
                    .into_iter()
                    .filter(|&n| {
                        !self
                            .grid
                            .occupants(n)
                            .iter()
                            .any(|&o| self.animals[o].species == Species::Predator)
                    })
                    .collect();
                if safe.is_empty() {
                    return cell;
                }

                let grassy: Vec<CellId> = safe
                    .iter()
                    .copied()
                    .filter(|&n| self.grass.is_grown(n))
                    .collect();
                let pool = if grassy.is_empty() { &safe } else { &grassy };
                pool.choose(&mut self.rng).copied().unwrap_or(cell)
            }
            // Chase: prefer cells holding prey, otherwise plain random walk.
            Species::Predator => {
                let hunting: Vec<CellId> = neighbors
                    .into_iter()
                    .filter(|&n| {
                        self.grid
                            .occupants(n)
                            .iter()
                            .any(|&o| self.animals[o].is_alive() && self.animals[o].species == Species::Prey)
                    })
                    .collect();
                if hunting.is_empty() {
                    self.grid.random_neighbor(cell, &mut self.rng)
                } else {
                    hunting.choose(&mut self.rng).copied().unwrap_or(cell)
                }
            }
        }
    }

    /// Prey feeding: eat the grown grass patch under the animal, if any,
    /// and schedule its regrowth.
    fn graze(&mut self, idx: AnimalId) {
        let cell = self.animals[idx].cell;
        if self.grass.is_grown(cell) {
            let gain = self.animals[idx].params.energy_from_food;
            self.animals[idx].energy += gain;
            self.grass.deplete(cell);
            self.scheduler
                .schedule_at(self.time + self.grass.regrowth_time(), Event::RegrowGrass {
                    cell,
                });
        }
    }

    /// Predator feeding: eat one living prey co-located on the cell, chosen
    /// uniformly at random.
    fn hunt(&mut self, idx: AnimalId) -> Result<(), SimError> {
        let cell = self.animals[idx].cell;
        let prey_here: Vec<AnimalId> = self
            .grid
            .occupants(cell)
            .iter()
            .copied()
            .filter(|&o| self.animals[o].is_alive() && self.animals[o].species == Species::Prey)
            .collect();

        if let Some(&victim) = prey_here.choose(&mut self.rng) {
            self.kill_animal(victim)?;
            let gain = self.animals[idx].params.energy_from_food;
            self.animals[idx].energy += gain;
        }
        Ok(())
    }

    /// Remove an animal from the simulation permanently.
    fn kill_animal(&mut self, idx: AnimalId) -> Result<(), SimError> {
        let cell = self.animals[idx].cell;
        self.animals[idx].kill();
        self.grid.remove(cell, idx)
    }

    fn spawn_offspring(&mut self, idx: AnimalId) {
        let id = self.next_animal_id;
        self.next_animal_id += 1;

        let child = self.animals[idx].split_offspring(id);
        let slot = self.animals.len();
        self.grid.insert(child.cell, slot);
        self.animals.push(child);
    }

    fn apply_event(&mut self, event: Event) -> Result<(), SimError> {
        match event {
            Event::RegrowGrass { cell } => {
                log::trace!("grass regrown at cell {}", cell);
                self.grass.regrow(cell)
            }
        }
    }

    /// Drop tombstoned animals and rebuild the occupant index. Arena order
    /// of survivors is preserved, keeping the stepping order stable.
    fn sweep_dead(&mut self) {
        self.animals.retain(|a| a.is_alive());
        self.grid.clear_occupants();
        for (idx, animal) in self.animals.iter().enumerate() {
            self.grid.insert(animal.cell, idx);
        }
    }

    /// Total living population.
    pub fn population(&self) -> usize {
        self.animals.iter().filter(|a| a.is_alive()).count()
    }

    pub fn prey_count(&self) -> usize {
        self.count_species(Species::Prey)
    }

    pub fn predator_count(&self) -> usize {
        self.count_species(Species::Predator)
    }

    fn count_species(&self, species: Species) -> usize {
        self.animals
            .iter()
            .filter(|a| a.is_alive() && a.species == species)
            .count()
    }

    /// Check if the population has collapsed. A valid steady state, not an
    /// error.
    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Get seed for reproducibility.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
