//! The choice stack used for backtracking search (spec section 4.E).
//!
//! Each frame records a full-grid snapshot taken just before a branch was
//! committed, the branched-on position, and the set of candidates already
//! tried at that position. Backtracking restores the snapshot and removes
//! the tried candidate from the cell before re-descending.

use rand::{Rng, RngExt};

use crate::grid::Grid;
use crate::pset::Pset;

/// One frame of the choice stack.
#[derive(Debug, Clone)]
struct ChoiceRecord {
    snapshot: Grid,
    row: usize,
    col: usize,
    tried: Pset,
}

/// A LIFO stack of [`ChoiceRecord`]s.
#[derive(Debug, Default, Clone)]
pub struct ChoiceStack {
    frames: Vec<ChoiceRecord>,
}

impl ChoiceStack {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Records a branch about to be committed: `snapshot` is the grid as it
    /// stood before `color` was forced into `(row, col)`.
    pub fn push(&mut self, snapshot: Grid, row: usize, col: usize, color: Pset) {
        self.frames.push(ChoiceRecord {
            snapshot,
            row,
            col,
            tried: color,
        });
    }

    /// Undoes the most recent branch: restores its snapshot, removes the
    /// tried candidate from the branched cell, and returns the restored
    /// grid together with the position that must now be retried with a
    /// narrower candidate set. `None` if the stack is empty (search is
    /// exhausted).
    pub fn pop(&mut self) -> Option<(Grid, usize, usize)> {
        let frame = self.frames.pop()?;
        let mut grid = frame.snapshot;
        let narrowed = grid.get(frame.row, frame.col).without(frame.tried);
        grid.set(frame.row, frame.col, narrowed);
        Some((grid, frame.row, frame.col))
    }
}

/// Picks the next cell to branch on and the color to try there.
pub trait BranchPolicy {
    /// Returns the `(row, col)` of the cell to branch on: the first
    /// unsolved cell with minimum cardinality `>= 2`, per spec section 4.E.
    /// `None` if every cell is already a singleton.
    fn choose_cell(&mut self, grid: &Grid) -> Option<(usize, usize)>;

    /// Returns one candidate color out of `candidates` to try first.
    fn choose_color(&mut self, candidates: Pset) -> u32;
}

/// Deterministic: the lexicographically-first minimum-cardinality cell, and
/// its lowest-index candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lexicographic;

impl BranchPolicy for Lexicographic {
    fn choose_cell(&mut self, grid: &Grid) -> Option<(usize, usize)> {
        minimum_cardinality_cell(grid)
    }

    fn choose_color(&mut self, candidates: Pset) -> u32 {
        candidates.leftmost().color().expect("non-empty candidates")
    }
}

/// Randomized: uniformly at random among all minimum-cardinality cells, and
/// a uniformly random candidate color at that cell.
pub struct Random<'r, R: Rng> {
    rng: &'r mut R,
}

impl<'r, R: Rng> Random<'r, R> {
    pub fn new(rng: &'r mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> BranchPolicy for Random<'_, R> {
    fn choose_cell(&mut self, grid: &Grid) -> Option<(usize, usize)> {
        let candidates = minimum_cardinality_cells(grid);
        if candidates.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..candidates.len());
        Some(candidates[pick])
    }

    fn choose_color(&mut self, candidates: Pset) -> u32 {
        candidates
            .choose(self.rng)
            .expect("non-empty candidates")
    }
}

/// The first (in row-major order) unsolved cell whose cardinality is the
/// minimum over all unsolved cells, or `None` if the grid is fully solved.
fn minimum_cardinality_cell(grid: &Grid) -> Option<(usize, usize)> {
    let n = grid.n();
    let mut best: Option<(usize, usize, u32)> = None;
    for r in 0..n {
        for c in 0..n {
            let cell = grid.get(r, c);
            if cell.singleton() {
                continue;
            }
            let card = cell.cardinality();
            match best {
                Some((_, _, best_card)) if best_card <= card => {}
                _ => best = Some((r, c, card)),
            }
        }
    }
    best.map(|(r, c, _)| (r, c))
}

/// All unsolved cells sharing the minimum cardinality, in row-major order.
fn minimum_cardinality_cells(grid: &Grid) -> Vec<(usize, usize)> {
    let n = grid.n();
    let mut min_card = None;
    let mut positions = Vec::new();
    for r in 0..n {
        for c in 0..n {
            let cell = grid.get(r, c);
            if cell.singleton() {
                continue;
            }
            let card = cell.cardinality();
            match min_card {
                None => {
                    min_card = Some(card);
                    positions.push((r, c));
                }
                Some(m) if card < m => {
                    min_card = Some(card);
                    positions.clear();
                    positions.push((r, c));
                }
                Some(m) if card == m => positions.push((r, c)),
                _ => {}
            }
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_restores_the_snapshot_and_narrows_the_cell() {
        let mut grid = Grid::new(4).unwrap();
        let before = grid.clone();
        grid.set(0, 0, Pset::of_color(0));

        let mut stack = ChoiceStack::new();
        stack.push(before.clone(), 0, 0, Pset::of_color(0));
        assert_eq!(stack.depth(), 1);

        let (restored, row, col) = stack.pop().unwrap();
        assert_eq!((row, col), (0, 0));
        assert_eq!(
            restored.get(0, 0),
            before.get(0, 0).without(Pset::of_color(0))
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_stack_returns_none() {
        let mut stack = ChoiceStack::new();
        assert!(stack.pop().is_none());
    }

    #[test]
    fn lexicographic_picks_the_first_minimum_cardinality_cell() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(0, 0, Pset::of_color(0));
        grid.set(1, 1, Pset::of_color(0) | Pset::of_color(1));
        let mut policy = Lexicographic;
        assert_eq!(policy.choose_cell(&grid), Some((0, 1)));
    }

    #[test]
    fn lexicographic_returns_none_on_a_fully_solved_grid() {
        let mut grid = Grid::new(4).unwrap();
        for r in 0..4 {
            for c in 0..4 {
                grid.set(r, c, Pset::of_color(((r + c) % 4) as u32));
            }
        }
        let mut policy = Lexicographic;
        assert_eq!(policy.choose_cell(&grid), None);
    }
}
