//! Puzzle generation (spec section 4.G): a thin client of the solver that
//! drives a random completion and then erases cells.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::choice::Random;
use crate::error::GridSizeError;
use crate::grid::Grid;
use crate::heuristics::{propagate, Outcome, Progress, Silent};
use crate::pset::Pset;
use crate::search::{count_solutions, solve, SolveOutcome};

/// How aggressively [`Generator::generate`] erases cells after finding a
/// random completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Blank a fixed fraction (`floor(2*n*n/3)`) of cells, in random order,
    /// without checking uniqueness.
    Default,
    /// Erase cells one at a time, in random order, stopping at the first
    /// erasure that would make the completion non-unique. The remaining
    /// cells, past that point, are left exactly as they were.
    Strict,
}

/// Generates a puzzle of size `n`.
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    n: usize,
    mode: Mode,
}

impl Generator {
    /// # Errors
    /// Returns [`GridSizeError`] if `n` is not an allowed grid size.
    pub fn new(n: usize, mode: Mode) -> Result<Self, GridSizeError> {
        Grid::new(n)?;
        Ok(Self { n, mode })
    }

    /// Runs the generator to completion: a random full grid, then erased
    /// per `self.mode`.
    pub fn generate(&self, rng: &mut impl Rng) -> Grid {
        let mut grid = self.fill(rng);
        let mut order: Vec<usize> = (0..self.n * self.n).collect();
        order.shuffle(rng);

        match self.mode {
            Mode::Default => self.erase_fixed_fraction(&mut grid, &order),
            Mode::Strict => self.erase_while_unique(&mut grid, &order, rng),
        }
        grid
    }

    /// Step 1-3: a random valid completion of an empty `n x n` grid.
    fn fill(&self, rng: &mut impl Rng) -> Grid {
        let mut grid = Grid::new(self.n).expect("n validated in new()");
        let mut policy = Random::new(rng);
        let outcome = solve(&mut grid, &mut policy, &mut Silent);
        debug_assert_eq!(
            outcome,
            SolveOutcome::Solved,
            "an empty grid always has a completion"
        );
        grid
    }

    /// Default mode: blanks the first `floor(2*n*n/3)` cells of `order`.
    fn erase_fixed_fraction(&self, grid: &mut Grid, order: &[usize]) {
        let count = (2 * self.n * self.n) / 3;
        for &index in order.iter().take(count) {
            let (row, col) = (index / self.n, index % self.n);
            grid.set(row, col, Pset::full(self.n));
        }
    }

    /// Strict mode: erases cells in `order` one at a time, stopping (not
    /// skipping) at the first erasure that breaks uniqueness.
    fn erase_while_unique(&self, grid: &mut Grid, order: &[usize], rng: &mut impl Rng) {
        for (erased, &index) in order.iter().enumerate() {
            let (row, col) = (index / self.n, index % self.n);
            let saved = grid.get(row, col);
            grid.set(row, col, Pset::full(self.n));

            if self.still_unique(grid, rng) {
                debug!("erase ({row}, {col}): still unique, {} cells blanked so far", erased + 1);
            } else {
                debug!("erase ({row}, {col}): breaks uniqueness, stopping after {erased} blanks");
                grid.set(row, col, saved);
                break;
            }
        }
    }

    /// A candidate erasure is accepted only if the resulting grid still
    /// has exactly one completion.
    fn still_unique(&self, grid: &Grid, rng: &mut impl Rng) -> bool {
        let mut probe = grid.clone();
        if propagate(&mut probe, &mut Silent) == Outcome::Inconsistent {
            return false;
        }
        let mut policy = Random::new(rng);
        count_solutions(&mut probe, &mut policy, &mut Silent, 2) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::is_consistent;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn default_mode_blanks_exactly_the_expected_fraction() {
        let generator = Generator::new(4, Mode::Default).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = generator.generate(&mut rng);

        let blanks = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&(r, c)| grid.get(r, c) == Pset::full(4))
            .count();
        assert_eq!(blanks, (2 * 4 * 4) / 3);
    }

    #[test]
    fn strict_mode_yields_a_uniquely_solvable_grid() {
        let generator = Generator::new(4, Mode::Strict).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let grid = generator.generate(&mut rng);

        assert!(is_consistent(&grid));
        let mut probe = grid.clone();
        let mut policy = Random::new(&mut rng);
        let count = count_solutions(&mut probe, &mut policy, &mut Silent, 2);
        assert_eq!(count, 1);
    }

    #[test]
    fn filled_grid_from_an_empty_board_is_solved() {
        let generator = Generator::new(9, Mode::Default).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let full = generator.fill(&mut rng);
        assert!(crate::consistency::is_solved(&full));
    }
}
