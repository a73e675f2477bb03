//! Generalized Sudoku constraint solving and generation.
//!
//! This crate is the solver *core*: candidate-set algebra, a grid type,
//! a consistency checker, a fixed-point propagation engine, a choice stack,
//! a backtracking search driver, and a puzzle generator. It does no I/O —
//! parsing, printing, and the CLI front end live in `sudoku-cli`.

pub mod alphabet;
pub mod choice;
pub mod consistency;
pub mod error;
pub mod generator;
pub mod grid;
pub mod heuristics;
pub mod pset;
pub mod search;

pub use choice::{BranchPolicy, Lexicographic, Random};
pub use consistency::{is_consistent, is_solved};
pub use error::GridSizeError;
pub use generator::{Generator, Mode};
pub use grid::{Grid, Pos, UnitPositions};
pub use heuristics::{propagate, Outcome, Progress, Silent};
pub use pset::Pset;
pub use search::{count_solutions, solve, SolveOutcome};
