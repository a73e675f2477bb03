//! The column-padded grid printer (spec section 6), mirroring the original
//! `grid_print`: fields are padded to the widest non-blank cell's
//! candidate-set string, plus one trailing space.

use std::io::{self, Write};

use sudoku::Grid;

/// Prints `grid` to `writer`.
///
/// `short_singleton_size_one` reproduces a quirk of the reference
/// implementation: a size-1 grid reached through the *solve* path prints
/// just its single character, with no padding or trailing newline
/// decoration — generated size-1 grids do not take this shortcut.
pub fn print_grid(
    grid: &Grid,
    mut writer: impl Write,
    short_singleton_size_one: bool,
) -> io::Result<()> {
    let n = grid.n();

    if n == 1 && short_singleton_size_one {
        writeln!(writer, "{}", grid.get(0, 0).to_string(1))?;
        return Ok(());
    }

    let full = sudoku::Pset::full(n);
    let max_cardinality = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .map(|(r, c)| grid.get(r, c))
        .filter(|&cell| cell != full)
        .map(sudoku::Pset::cardinality)
        .max()
        .unwrap_or(0);

    for r in 0..n {
        for c in 0..n {
            let cell = grid.get(r, c);
            if cell == full {
                write!(writer, "_")?;
                for _ in 0..max_cardinality {
                    write!(writer, " ")?;
                }
            } else {
                write!(writer, "{} ", cell.to_string(n))?;
                for _ in 0..(max_cardinality - cell.cardinality()) {
                    write!(writer, " ")?;
                }
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
