use super::Cell;
use super::rules::{Rule, default_rule};
use crate::error::{EngineError, Result};
use rayon::prelude::*;

/// Cell count above which `tick` computes the successor in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// GridState owns the toroidal cell buffer of the automaton.
///
/// Cells are stored row-major. Every generation is computed from a read-only
/// view of the previous one and swapped in whole, so a reader never observes
/// a half-written generation.
pub struct GridState {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    rule: Box<dyn Rule>,
    generation: u64,
    parallel_threshold: usize,
}

impl GridState {
    /// Create a grid from an initial row-major cell sequence
    pub fn create(width: u32, height: u32, initial: Vec<Cell>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if initial.len() != expected {
            return Err(EngineError::SizeMismatch {
                expected,
                actual: initial.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells: initial,
            rule: default_rule(),
            generation: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Replace the transition rule (builder style)
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rule = rule;
        self
    }

    /// Replace the transition rule in place; the next tick uses it
    pub fn set_rule(&mut self, rule: Box<dyn Rule>) {
        self.rule = rule;
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of ticks applied since creation
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Convert wrapped coordinates to a buffer index
    fn index(&self, row: i64, col: i64) -> usize {
        let row = row.rem_euclid(self.height as i64) as usize;
        let col = col.rem_euclid(self.width as i64) as usize;
        row * self.width as usize + col
    }

    /// Get the cell at (row, col); both coordinates wrap around the torus
    pub fn get(&self, row: i64, col: i64) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Set the cell at (row, col) with the same wrapping as `get`
    pub fn set(&mut self, row: i64, col: i64, cell: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = cell;
    }

    /// Read-only view of the current, fully settled generation
    pub fn snapshot(&self) -> &[Cell] {
        &self.cells
    }

    /// Count of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Count live neighbors using toroidal wrapping (grid wraps like a torus)
    pub fn live_neighbors(&self, row: i64, col: i64) -> u8 {
        (-1..=1)
            .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter(|&(dr, dc)| self.get(row + dr, col + dc).is_alive())
            .count() as u8
    }

    fn next_cell(&self, idx: usize) -> Cell {
        let row = (idx / self.width as usize) as i64;
        let col = (idx % self.width as usize) as i64;
        self.rule.evolve(self.cells[idx], self.live_neighbors(row, col))
    }

    /// Successor generation, computed serially
    pub fn successor(&self) -> Vec<Cell> {
        (0..self.cells.len()).map(|idx| self.next_cell(idx)).collect()
    }

    /// Successor generation, computed with rayon.
    /// Pays off for grids larger than roughly 100x100.
    pub fn successor_parallel(&self) -> Vec<Cell> {
        (0..self.cells.len())
            .into_par_iter()
            .map(|idx| self.next_cell(idx))
            .collect()
    }

    /// Replace the whole field and restart the generation count
    pub fn reseed(&mut self, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.cells.len() {
            return Err(EngineError::SizeMismatch {
                expected: self.cells.len(),
                actual: cells.len(),
            });
        }
        self.cells = cells;
        self.generation = 0;
        Ok(())
    }

    /// Advance one generation and swap the new buffer in
    pub fn tick(&mut self) {
        let next = if self.cells.len() >= self.parallel_threshold {
            self.successor_parallel()
        } else {
            self.successor()
        };
        debug_assert_eq!(next.len(), self.cells.len());

        self.cells = next;
        self.generation += 1;
    }
}
