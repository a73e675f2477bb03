use std::ops::{Index, IndexMut};

use tinyvec::ArrayVec;

use crate::alphabet::{is_allowed_size, isqrt};
use crate::error::GridSizeError;
use crate::pset::Pset;

/// A single `(row, col)` position in an up-to-64x64 grid.
pub type Pos = (u8, u8);

/// The `grid_size` positions of one row, column or block, in index order.
///
/// Stack-allocated: a unit never holds more than 64 positions (the largest
/// allowed grid size), so there is no reason to heap-allocate one per call.
pub type UnitPositions = ArrayVec<[Pos; 64]>;

/// An N x N board of [`Pset`]s, `N` one of the allowed grid sizes.
///
/// `N` is fixed for the lifetime of a `Grid` and is carried alongside the
/// cells rather than as a type parameter, so the solver can dispatch on a
/// runtime-selected size instead of monomorphizing over every allowed `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    cells: Vec<Pset>,
}

impl Grid {
    /// Allocates a fully-unconstrained `n x n` grid (every cell `full(n)`).
    ///
    /// # Errors
    /// Returns [`GridSizeError`] if `n` is not in `{1,4,9,16,25,36,49,64}`.
    pub fn new(n: usize) -> Result<Self, GridSizeError> {
        if !is_allowed_size(n) {
            return Err(GridSizeError { size: n });
        }
        Ok(Self {
            n,
            cells: vec![Pset::full(n); n * n],
        })
    }

    /// The grid's side length, i.e. the number of colors.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// `sqrt(n)`: the side length of a block.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        isqrt(self.n)
    }

    #[must_use]
    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.n && col < self.n);
        row * self.n + col
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Pset {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Pset) {
        let i = self.index(row, col);
        self.cells[i] = value;
    }

    /// No cell is empty.
    #[must_use]
    pub fn well_formed(&self) -> bool {
        self.cells.iter().all(|&c| c != Pset::EMPTY)
    }

    /// The positions of row `r`, in column order.
    #[must_use]
    pub fn row_positions(&self, r: usize) -> UnitPositions {
        (0..self.n).map(|c| (r as u8, c as u8)).collect()
    }

    /// The positions of column `c`, in row order.
    #[must_use]
    pub fn col_positions(&self, c: usize) -> UnitPositions {
        (0..self.n).map(|r| (r as u8, c as u8)).collect()
    }

    /// The positions of block `k` (`0 <= k < n`), in row-major order within
    /// the block: block `k` covers rows `(k/b)*b .. +b` and columns
    /// `(k%b)*b .. +b` where `b = block_size()`.
    #[must_use]
    pub fn block_positions(&self, k: usize) -> UnitPositions {
        let b = self.block_size();
        let init_row = (k / b) * b;
        let init_col = (k % b) * b;
        let mut positions = UnitPositions::new();
        for i in 0..b {
            for j in 0..b {
                positions.push(((init_row + i) as u8, (init_col + j) as u8));
            }
        }
        positions
    }

    /// All `3n` units: rows `0..n`, then columns `0..n`, then blocks `0..n`.
    ///
    /// This order (and the within-unit order used by `row_positions` /
    /// `col_positions` / `block_positions`) is what makes propagation
    /// deterministic across runs.
    pub fn units(&self) -> impl Iterator<Item = UnitPositions> + '_ {
        (0..self.n)
            .map(|r| self.row_positions(r))
            .chain((0..self.n).map(|c| self.col_positions(c)))
            .chain((0..self.n).map(|k| self.block_positions(k)))
    }
}

impl Index<Pos> for Grid {
    type Output = Pset;
    fn index(&self, (r, c): Pos) -> &Pset {
        &self.cells[self.index(r as usize, c as usize)]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, (r, c): Pos) -> &mut Pset {
        let i = self.index(r as usize, c as usize);
        &mut self.cells[i]
    }
}
