//! Whole-grid consistency and solved checks (spec section 4.C).
//!
//! Both are pure, side-effect-free, and O(n^3) overall (O(n^2) per unit,
//! 3n units).

use crate::grid::{Grid, UnitPositions};
use crate::pset::Pset;

/// A grid is consistent when, for every unit: no cell is empty, no two
/// distinct positions hold the same singleton, and the union of all cells
/// covers every color.
#[must_use]
pub fn is_consistent(grid: &Grid) -> bool {
    grid.units().all(|unit| unit_is_consistent(grid, &unit))
}

fn unit_is_consistent(grid: &Grid, unit: &UnitPositions) -> bool {
    let mut union = Pset::EMPTY;
    for &(r, c) in unit {
        let cell = grid.get(r as usize, c as usize);
        if cell == Pset::EMPTY {
            return false;
        }
        union |= cell;
    }
    for i in 0..unit.len() {
        let (ri, ci) = unit[i];
        let a = grid.get(ri as usize, ci as usize);
        if !a.singleton() {
            continue;
        }
        for &(rj, cj) in unit.iter().skip(i + 1) {
            let b = grid.get(rj as usize, cj as usize);
            if b.singleton() && a == b {
                return false;
            }
        }
    }
    union == Pset::full(grid.n())
}

/// A grid is solved when every cell of every unit is a singleton and the
/// xor of the n singletons in each unit is `full(n)` (a permutation of the
/// colors).
#[must_use]
pub fn is_solved(grid: &Grid) -> bool {
    grid.units().all(|unit| unit_is_permutation(grid, &unit))
}

fn unit_is_permutation(grid: &Grid, unit: &UnitPositions) -> bool {
    let mut acc = Pset::EMPTY;
    for &(r, c) in unit {
        let cell = grid.get(r as usize, c as usize);
        if !cell.singleton() {
            return false;
        }
        acc = acc ^ cell;
    }
    acc == Pset::full(grid.n())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_cell_is_always_inconsistent() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(0, 0, Pset::EMPTY);
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn duplicate_singletons_in_a_row_are_inconsistent() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(0, 0, Pset::of_color(0));
        grid.set(0, 1, Pset::of_color(0));
        assert!(!is_consistent(&grid));
    }

    #[test]
    fn a_fresh_full_grid_is_consistent_but_not_solved() {
        let grid = Grid::new(9).unwrap();
        assert!(is_consistent(&grid));
        assert!(!is_solved(&grid));
    }

    #[test]
    fn a_valid_latin_square_is_solved() {
        let mut grid = Grid::new(4).unwrap();
        let rows = [[0, 1, 2, 3], [2, 3, 0, 1], [1, 0, 3, 2], [3, 2, 1, 0]];
        for (r, row) in rows.iter().enumerate() {
            for (c, &color) in row.iter().enumerate() {
                grid.set(r, c, Pset::of_color(color));
            }
        }
        assert!(is_solved(&grid));
        assert!(is_consistent(&grid));
    }
}
