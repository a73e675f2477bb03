//! Depth-first backtracking search over a choice stack (spec section 4.E,
//! 4.F): a thin driver around [`propagate`] that branches on
//! [`Outcome::Stuck`] and backtracks on [`Outcome::Inconsistent`].

use log::trace;

use crate::choice::{BranchPolicy, ChoiceStack};
use crate::grid::Grid;
use crate::heuristics::{propagate, Outcome, Progress};
use crate::pset::Pset;

/// Result of [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// `grid` now holds a solution.
    Solved,
    /// The search space was exhausted; no solution exists for the grid as
    /// given.
    Unsolvable,
}

/// Solves `grid` in place via propagation interleaved with backtracking.
/// Stops at the first solution found.
pub fn solve(
    grid: &mut Grid,
    policy: &mut impl BranchPolicy,
    progress: &mut impl Progress,
) -> SolveOutcome {
    let mut stack = ChoiceStack::new();
    loop {
        match propagate(grid, progress) {
            Outcome::Solved => return SolveOutcome::Solved,
            Outcome::Inconsistent => match backtrack(&mut stack, grid) {
                true => continue,
                false => return SolveOutcome::Unsolvable,
            },
            Outcome::Stuck => branch(grid, &mut stack, policy, progress),
        }
    }
}

/// Counts distinct solutions of `grid`, stopping early once `cap` have been
/// found (spec section 4.F, used to check uniqueness with `cap = 2`).
/// `grid` is left in an unspecified but consistent state when this returns.
pub fn count_solutions(
    grid: &mut Grid,
    policy: &mut impl BranchPolicy,
    progress: &mut impl Progress,
    cap: usize,
) -> usize {
    let mut stack = ChoiceStack::new();
    let mut found = 0usize;
    loop {
        if found >= cap {
            return found;
        }
        match propagate(grid, progress) {
            Outcome::Solved => {
                found += 1;
                if !backtrack(&mut stack, grid) {
                    return found;
                }
            }
            Outcome::Inconsistent => {
                if !backtrack(&mut stack, grid) {
                    return found;
                }
            }
            Outcome::Stuck => branch(grid, &mut stack, policy, progress),
        }
    }
}

/// Restores the most recent choice-stack frame into `grid`, narrowing the
/// branched cell by the candidate already tried there. Returns `false` if
/// the stack was empty (search exhausted).
fn backtrack(stack: &mut ChoiceStack, grid: &mut Grid) -> bool {
    match stack.pop() {
        Some((restored, row, col)) => {
            trace!("backtrack: popped frame for ({row}, {col}), depth now {}", stack.depth());
            *grid = restored;
            true
        }
        None => {
            trace!("backtrack: stack empty, search exhausted");
            false
        }
    }
}

/// Commits one branch: snapshots `grid`, picks a cell and a candidate color
/// via `policy`, and narrows the cell to that single color.
fn branch(
    grid: &mut Grid,
    stack: &mut ChoiceStack,
    policy: &mut impl BranchPolicy,
    progress: &mut impl Progress,
) {
    let (row, col) = policy
        .choose_cell(grid)
        .expect("Stuck implies some cell has cardinality >= 2");
    let candidates = grid.get(row, col);
    let color = policy.choose_color(candidates);
    let chosen = Pset::of_color(color);

    trace!(
        "branch: ({row}, {col}) has {} candidates, trying color {color}, depth now {}",
        candidates.cardinality(),
        stack.depth() + 1,
    );
    progress.before_branch(grid, row, col, chosen);
    stack.push(grid.clone(), row, col, chosen);
    grid.set(row, col, chosen);
}
