//! Toroidal grid topology, occupant index and the grass layer.

use crate::animal::AnimalId;
use crate::error::SimError;
use rand::prelude::*;

/// Cell identifier: `row * width + col` into the flat cell array.
pub type CellId = usize;

/// Toroidal 2D lattice with per-cell occupant sets.
///
/// Cells are created once and never destroyed. Each cell holds an unordered
/// multiset of animal ids; capacity is unbounded. The neighborhood is
/// 4-connected (von Neumann) with wrap-around on both axes.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    /// occupants[cell] contains ids of animals currently at that cell
    occupants: Vec<Vec<AnimalId>>,
}

impl Grid {
    /// Create a new grid of `width x height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            occupants: vec![Vec::new(); width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Cell id at `(row, col)`.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> CellId {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    /// `(row, col)` coordinates of a cell id.
    #[inline]
    pub fn coords(&self, cell: CellId) -> (usize, usize) {
        (cell / self.width, cell % self.width)
    }

    /// The 4-connected toroidal neighborhood of a cell.
    ///
    /// Deduplicated and never containing the cell itself, so degenerate
    /// grids (width or height <= 2) yield fewer than 4 neighbors.
    pub fn neighbors(&self, cell: CellId) -> Vec<CellId> {
        let (row, col) = self.coords(cell);
        let up = self.cell_at((row + self.height - 1) % self.height, col);
        let down = self.cell_at((row + 1) % self.height, col);
        let left = self.cell_at(row, (col + self.width - 1) % self.width);
        let right = self.cell_at(row, (col + 1) % self.width);

        let mut out = vec![up, down, left, right];
        out.sort_unstable();
        out.dedup();
        out.retain(|&n| n != cell);
        out
    }

    /// All animal ids currently at a cell.
    #[inline]
    pub fn occupants(&self, cell: CellId) -> &[AnimalId] {
        &self.occupants[cell]
    }

    /// Add an animal to a cell's occupant set.
    #[inline]
    pub fn insert(&mut self, cell: CellId, id: AnimalId) {
        self.occupants[cell].push(id);
    }

    /// Remove an animal from a cell's occupant set. O(occupants) scan,
    /// O(1) removal via swap-remove; ordering within a cell is not
    /// significant.
    pub fn remove(&mut self, cell: CellId, id: AnimalId) -> Result<(), SimError> {
        let slot = &mut self.occupants[cell];
        match slot.iter().position(|&o| o == id) {
            Some(pos) => {
                slot.swap_remove(pos);
                Ok(())
            }
            None => Err(SimError::invariant(format!(
                "animal {} not present in cell {}",
                id, cell
            ))),
        }
    }

    /// Move an animal between two cells.
    pub fn relocate(&mut self, id: AnimalId, from: CellId, to: CellId) -> Result<(), SimError> {
        if from == to {
            return Ok(());
        }
        self.remove(from, id)?;
        self.insert(to, id);
        Ok(())
    }

    /// Drop all occupant entries, keeping the topology.
    pub fn clear_occupants(&mut self) {
        for slot in &mut self.occupants {
            slot.clear();
        }
    }

    /// Uniformly random cell.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> CellId {
        rng.gen_range(0..self.cell_count())
    }

    /// Uniformly random neighbor of a cell. On a 1x1 grid the cell has no
    /// neighbors and is returned unchanged.
    pub fn random_neighbor<R: Rng>(&self, cell: CellId, rng: &mut R) -> CellId {
        self.neighbors(cell).choose(rng).copied().unwrap_or(cell)
    }
}

/// State of a single ground cell.
///
/// `Ground` is the inert marker used when grass is disabled; `Grass` cycles
/// between grown and depleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Patch {
    Ground,
    Grass { grown: bool },
}

/// Ground-resource layer: exactly one patch per grid cell.
///
/// Depletion is synchronous (a prey feeding) and must be paired with exactly
/// one scheduled regrowth event; regrowth is asynchronous, applied when the
/// event fires.
#[derive(Clone, Debug)]
pub struct GrassField {
    patches: Vec<Patch>,
    regrowth_time: u64,
}

impl GrassField {
    /// Inert field for grass-disabled runs.
    pub fn bare(cells: usize, regrowth_time: u64) -> Self {
        Self {
            patches: vec![Patch::Ground; cells],
            regrowth_time,
        }
    }

    /// Field of grass patches, all initially depleted. Callers seed grown
    /// state and regrowth events afterwards.
    pub fn sown(cells: usize, regrowth_time: u64) -> Self {
        Self {
            patches: vec![Patch::Grass { grown: false }; cells],
            regrowth_time,
        }
    }

    /// Ticks between depletion and regrowth.
    #[inline]
    pub fn regrowth_time(&self) -> u64 {
        self.regrowth_time
    }

    /// Whether grass patches exist at all (false for bare ground).
    pub fn enabled(&self) -> bool {
        matches!(self.patches.first(), Some(Patch::Grass { .. }))
    }

    /// Whether the patch at `cell` is grown grass. Bare ground is never
    /// grown.
    #[inline]
    pub fn is_grown(&self, cell: CellId) -> bool {
        matches!(self.patches[cell], Patch::Grass { grown: true })
    }

    /// Flip a grown patch to depleted. The caller schedules the matching
    /// regrowth event.
    pub fn deplete(&mut self, cell: CellId) {
        debug_assert!(self.is_grown(cell), "depleting a patch that is not grown");
        self.patches[cell] = Patch::Grass { grown: false };
    }

    /// Flip a depleted patch back to grown, as driven by a fired regrowth
    /// event.
    pub fn regrow(&mut self, cell: CellId) -> Result<(), SimError> {
        match self.patches[cell] {
            Patch::Grass { grown: false } => {
                self.patches[cell] = Patch::Grass { grown: true };
                Ok(())
            }
            Patch::Grass { grown: true } => Err(SimError::invariant(format!(
                "regrowth fired for already grown patch at cell {}",
                cell
            ))),
            Patch::Ground => Err(SimError::invariant(format!(
                "regrowth fired for bare ground at cell {}",
                cell
            ))),
        }
    }

    /// Number of grown patches (0 when grass is disabled).
    pub fn grown_count(&self) -> usize {
        self.patches
            .iter()
            .filter(|p| matches!(p, Patch::Grass { grown: true }))
            .count()
    }
}
