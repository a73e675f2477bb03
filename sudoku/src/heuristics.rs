//! The fixed-point propagation engine (spec section 4.D): four rules,
//! applied to a grid until none of them can make further progress.

use tinyvec::ArrayVec;

use crate::consistency::{is_consistent, is_solved};
use crate::grid::{Grid, UnitPositions};
use crate::pset::Pset;

/// Result of running [`propagate`] to its fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every cell is a singleton and every unit is a permutation.
    Solved,
    /// No rule could make further progress, but the grid isn't solved: a
    /// branch is required.
    Stuck,
    /// A unit violated consistency; the caller must backtrack.
    Inconsistent,
}

/// Observes the propagation/search loop without influencing it. Used by the
/// CLI to implement `--verbose`; the solver core never does I/O itself.
pub trait Progress {
    /// Called once per propagation round, with the grid as it stood going
    /// into that round.
    fn after_round(&mut self, _grid: &Grid) {}

    /// Called just before a branch is committed, with the pre-branch grid,
    /// the cell being branched on, and the candidate being tried.
    fn before_branch(&mut self, _grid: &Grid, _row: usize, _col: usize, _tried: Pset) {}
}

/// A [`Progress`] that does nothing; the default for callers that don't
/// need tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {}

/// Runs the four heuristic rules to a fixed point (spec section 4.D).
pub fn propagate(grid: &mut Grid, progress: &mut impl Progress) -> Outcome {
    loop {
        progress.after_round(grid);

        let mut changed = apply_cross_naked_lone(grid);
        if !changed {
            changed = apply_locked_candidates(grid);
        }

        if !is_consistent(grid) {
            return Outcome::Inconsistent;
        }
        if !changed {
            return if is_solved(grid) {
                Outcome::Solved
            } else {
                Outcome::Stuck
            };
        }
    }
}

/// Rules 1-3 (cross-hatching, lone-number, naked-set) over all `3n` units.
fn apply_cross_naked_lone(grid: &mut Grid) -> bool {
    // Collected up front: `grid.units()` borrows the grid immutably for the
    // life of the iterator, which would conflict with the mutation below.
    let units: Vec<UnitPositions> = grid.units().collect();
    let mut changed = false;
    for unit in &units {
        changed |= cross_hatch(grid, unit);
        changed |= lone_number(grid, unit);
        changed |= naked_set(grid, unit);
    }
    changed
}

/// Rule 4 (locked candidates) over every block.
fn apply_locked_candidates(grid: &mut Grid) -> bool {
    let mut changed = false;
    for k in 0..grid.n() {
        changed |= locked_candidates(grid, k);
    }
    changed
}

/// For each singleton cell in `unit`, removes its color from every other
/// cell of `unit` that still carries it.
fn cross_hatch(grid: &mut Grid, unit: &UnitPositions) -> bool {
    let mut changed = false;
    for i in 0..unit.len() {
        let (ri, ci) = unit[i];
        let singleton = grid.get(ri as usize, ci as usize);
        if !singleton.singleton() {
            continue;
        }
        for &(rj, cj) in unit {
            if (rj, cj) == (ri, ci) {
                continue;
            }
            let cell = grid.get(rj as usize, cj as usize);
            let reduced = cell.without(singleton);
            if reduced != cell {
                grid.set(rj as usize, cj as usize, reduced);
                changed = true;
            }
        }
    }
    changed
}

/// For each non-singleton cell `i` of `unit`, if some color of `i` appears
/// in no other cell of `unit`, that color is forced into `i`.
fn lone_number(grid: &mut Grid, unit: &UnitPositions) -> bool {
    let mut changed = false;
    for &(ri, ci) in unit {
        let cell = grid.get(ri as usize, ci as usize);
        if cell.singleton() {
            continue;
        }
        let mut acc = cell;
        for &(rj, cj) in unit {
            if (rj, cj) == (ri, ci) {
                continue;
            }
            acc = acc.without(grid.get(rj as usize, cj as usize));
        }
        if acc.singleton() {
            grid.set(ri as usize, ci as usize, acc);
            changed = true;
        }
    }
    changed
}

/// Partitions `unit` by candidate-set equality. A class whose size is at
/// least the cardinality of its shared mask has its colors removed from
/// every other cell of the unit.
///
/// This is the *looser* naked-set test: the classical rule requires size
/// and cardinality to be equal, but the cardinality-cannot-exceed-size
/// bound (`|class| >= cardinality(mask)`) is still sound, just more
/// eager — see DESIGN.md.
fn naked_set(grid: &mut Grid, unit: &UnitPositions) -> bool {
    let mut classes: ArrayVec<[(Pset, UnitPositions); 64]> = ArrayVec::new();
    for &(r, c) in unit {
        let value = grid.get(r as usize, c as usize);
        if let Some((_, members)) = classes.iter_mut().find(|(mask, _)| *mask == value) {
            members.push((r, c));
        } else {
            let mut members = UnitPositions::new();
            members.push((r, c));
            classes.push((value, members));
        }
    }

    let mut changed = false;
    for (mask, members) in &classes {
        if (members.len() as u32) < mask.cardinality() {
            continue;
        }
        for &(r, c) in unit {
            if members.contains(&(r, c)) {
                continue;
            }
            let cell = grid.get(r as usize, c as usize);
            let reduced = cell.without(*mask);
            if reduced != cell {
                grid.set(r as usize, c as usize, reduced);
                changed = true;
            }
        }
    }
    changed
}

/// For block `k`: a color confined to a single intra-block row (or column)
/// among that block's non-singleton cells can be removed from the rest of
/// the real row (or column) outside the block.
fn locked_candidates(grid: &mut Grid, k: usize) -> bool {
    let b = grid.block_size();
    let block = grid.block_positions(k);

    let mut row_union = [Pset::EMPTY; 8];
    let mut col_union = [Pset::EMPTY; 8];
    for (idx, &(r, c)) in block.iter().enumerate() {
        let cell = grid.get(r as usize, c as usize);
        if !cell.singleton() {
            row_union[idx / b] |= cell;
            col_union[idx % b] |= cell;
        }
    }

    let mut changed = false;
    for i in 0..b {
        let mut row_locked = row_union[i];
        let mut col_locked = col_union[i];
        for (j, (&r, &c)) in row_union.iter().zip(col_union.iter()).take(b).enumerate() {
            if j == i {
                continue;
            }
            row_locked = row_locked.without(r);
            col_locked = col_locked.without(c);
        }
        if row_locked != Pset::EMPTY {
            changed |= cross_off_row(grid, k, i, row_locked);
        }
        if col_locked != Pset::EMPTY {
            changed |= cross_off_col(grid, k, i, col_locked);
        }
    }
    changed
}

/// Removes `colors` from the cells of block `k`'s intra-block row
/// `local_row` that lie *outside* the block — i.e. the rest of that real
/// row.
fn cross_off_row(grid: &mut Grid, k: usize, local_row: usize, colors: Pset) -> bool {
    let b = grid.block_size();
    let init_row = (k / b) * b;
    let init_col = (k % b) * b;
    let abs_row = init_row + local_row;

    let mut changed = false;
    for c in 0..grid.n() {
        if c >= init_col && c < init_col + b {
            continue;
        }
        let cell = grid.get(abs_row, c);
        let reduced = cell.without(colors);
        if reduced != cell {
            grid.set(abs_row, c, reduced);
            changed = true;
        }
    }
    changed
}

/// Symmetric to [`cross_off_row`], for columns.
fn cross_off_col(grid: &mut Grid, k: usize, local_col: usize, colors: Pset) -> bool {
    let b = grid.block_size();
    let init_row = (k / b) * b;
    let init_col = (k % b) * b;
    let abs_col = init_col + local_col;

    let mut changed = false;
    for r in 0..grid.n() {
        if r >= init_row && r < init_row + b {
            continue;
        }
        let cell = grid.get(r, abs_col);
        let reduced = cell.without(colors);
        if reduced != cell {
            grid.set(r, abs_col, reduced);
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::BLANK;

    fn parse(n: usize, rows: &[&str]) -> Grid {
        let mut grid = Grid::new(n).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let value = if ch == BLANK {
                    Pset::full(n)
                } else {
                    Pset::of_char(ch, n)
                };
                grid.set(r, c, value);
            }
        }
        grid
    }

    #[test]
    fn already_solved_grid_stays_solved() {
        let mut grid = parse(4, &["1234", "3412", "2143", "4321"]);
        assert_eq!(propagate(&mut grid, &mut Silent), Outcome::Solved);
    }

    #[test]
    fn classic_easy_9x9_solves_by_heuristics_alone() {
        let rows = [
            "53__7____",
            "6__195___",
            "_98____6_",
            "8___6___3",
            "4__8_3__1",
            "7___2___6",
            "_6____28_",
            "___419__5",
            "____8__79",
        ];
        let mut grid = parse(9, &rows);
        assert_eq!(propagate(&mut grid, &mut Silent), Outcome::Solved);
        let first_row: String = (0..9).map(|c| grid.get(0, c).to_string(9)).collect();
        assert_eq!(first_row, "534678912");
    }

    #[test]
    fn duplicate_given_clues_are_inconsistent() {
        let mut grid = Grid::new(9).unwrap();
        grid.set(0, 0, Pset::of_char('5', 9));
        grid.set(0, 1, Pset::of_char('5', 9));
        assert_eq!(propagate(&mut grid, &mut Silent), Outcome::Inconsistent);
    }

    #[test]
    fn propagation_never_adds_a_candidate_back() {
        let rows = [
            "53__7____",
            "6__195___",
            "_98____6_",
            "8___6___3",
            "4__8_3__1",
            "7___2___6",
            "_6____28_",
            "___419__5",
            "____8__79",
        ];
        let original = parse(9, &rows);
        let mut grid = original.clone();
        propagate(&mut grid, &mut Silent);
        for r in 0..9 {
            for c in 0..9 {
                assert!(grid.get(r, c).subset_of(original.get(r, c)));
            }
        }
    }

    #[test]
    fn propagation_is_idempotent_on_its_own_output() {
        let rows = [
            "53__7____",
            "6__195___",
            "_98____6_",
            "8___6___3",
            "4__8_3__1",
            "7___2___6",
            "_6____28_",
            "___419__5",
            "____8__79",
        ];
        let mut grid = parse(9, &rows);
        propagate(&mut grid, &mut Silent);
        let once = grid.clone();
        propagate(&mut grid, &mut Silent);
        assert_eq!(grid, once);
    }
}
