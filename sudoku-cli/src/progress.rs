//! `--verbose` tracing: reproduces the original `stack_print`/grid-dump
//! behavior as a [`sudoku::Progress`] implementation, so the solver core
//! stays entirely free of I/O.

use std::io::Write;

use sudoku::{Grid, Progress, Pset};

use crate::printer::print_grid;

/// Dumps the grid after every propagation round, and announces every
/// branch before it is committed — matching the reference implementation's
/// `-v` output.
pub struct VerboseProgress<W: Write> {
    sink: W,
}

impl<W: Write> VerboseProgress<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }
}

impl<W: Write> Progress for VerboseProgress<W> {
    fn after_round(&mut self, grid: &Grid) {
        let _ = print_grid(grid, &mut self.sink, false);
    }

    fn before_branch(&mut self, grid: &Grid, row: usize, col: usize, tried: Pset) {
        let n = grid.n();
        let _ = print_grid(grid, &mut self.sink, false);
        let _ = writeln!(
            self.sink,
            "Next choice at: grid[{row}][{col}] = '{}', and choice is = '{}'",
            grid.get(row, col).to_string(n),
            tried.to_string(n),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn before_branch_writes_the_grid_and_a_trace_line() {
        let grid = Grid::new(4).unwrap();
        let mut out = Vec::new();
        {
            let mut progress = VerboseProgress::new(&mut out);
            progress.before_branch(&grid, 0, 0, Pset::of_color(0));
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Next choice at: grid[0][0]"));
    }
}
