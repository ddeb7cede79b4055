//! Animal arena entries and per-kind behavioral parameters.

use crate::grid::CellId;

/// Arena index of an animal. The grid's occupant sets store these; they are
/// only valid until the end-of-tick compaction.
pub type AnimalId = usize;

/// The two mobile consumer kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Prey,
    Predator,
}

/// Behavioral parameters carried by each animal and inherited by offspring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimalParams {
    /// Per-tick Bernoulli probability of producing one offspring.
    pub reproduction_probability: f32,
    /// Energy gained from a successful feed.
    pub energy_from_food: f32,
    /// Energy paid per tick for moving.
    pub movement_cost: f32,
    /// Fraction of the parent's energy transferred to the offspring.
    pub reproduction_energy_share: f32,
    /// Use the kind-specific filtered movement policy instead of a plain
    /// random walk.
    pub smart_movement: bool,
}

/// A mobile agent in the simulation arena.
///
/// Holds a cell index back into the grid rather than a reference, so the
/// world remains the single owner of both sides. Death tombstones the entry
/// (`alive = false`); the world sweeps tombstones at end of tick.
#[derive(Clone, Debug)]
pub struct Animal {
    pub id: u64,
    pub species: Species,
    pub cell: CellId,
    pub energy: f32,
    pub params: AnimalParams,
    alive: bool,
}

impl Animal {
    pub fn new(id: u64, species: Species, cell: CellId, energy: f32, params: AnimalParams) -> Self {
        Self {
            id,
            species,
            cell,
            energy,
            params,
            alive: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the animal dead. Terminal: a dead animal never steps again.
    pub fn kill(&mut self) {
        debug_assert!(self.alive, "killing an animal already marked dead");
        self.alive = false;
    }

    /// Split off one offspring, conserving energy exactly: the offspring
    /// receives `energy * share` and the parent keeps the remainder. The
    /// offspring inherits the parent's cell and all behavioral parameters.
    pub fn split_offspring(&mut self, id: u64) -> Animal {
        let offspring_energy = self.energy * self.params.reproduction_energy_share;
        self.energy -= offspring_energy;
        Animal::new(id, self.species, self.cell, offspring_energy, self.params)
    }
}
