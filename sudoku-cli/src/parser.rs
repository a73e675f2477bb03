//! The textual grid format (spec section 6): one row per line, `_` for a
//! blank cell, `#` comments, blank lines ignored, whitespace ignored within
//! a line. This format is external to the solver core — only the CLI knows
//! about it.

use derive_more::{Display, Error};
use sudoku::alphabet::{is_allowed_size, BLANK};
use sudoku::{Grid, Pset};

/// Why a grid failed to parse.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseGridError {
    #[display("wrong character '{ch}' at line {line}")]
    InvalidChar { line: usize, ch: char },
    #[display("line {line} is malformed: expected {expected} cells, found {found}")]
    InvalidLineLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[display("too many/few lines in the grid: expected {expected}, found {found}")]
    InvalidLineCount { expected: usize, found: usize },
    #[display("wrong grid size: {size}")]
    InvalidSize { size: usize },
    #[display("empty input")]
    Empty,
}

/// Parses `text` into a [`Grid`]. The size is determined by the first data
/// line's length.
pub fn parse(text: &str) -> Result<Grid, ParseGridError> {
    let data_lines = data_lines(text);
    let mut rows = data_lines.into_iter();

    let first = rows.next().ok_or(ParseGridError::Empty)?;
    let n = first.1.len();
    if !is_allowed_size(n) {
        return Err(ParseGridError::InvalidSize { size: n });
    }

    let mut grid = Grid::new(n).map_err(|e| ParseGridError::InvalidSize { size: e.size })?;
    fill_row(&mut grid, 0, &first.1, first.0, n)?;

    let mut row_count = 1;
    for (line_no, row) in rows {
        if row_count >= n {
            return Err(ParseGridError::InvalidLineCount {
                expected: n,
                found: row_count + 1,
            });
        }
        fill_row(&mut grid, row_count, &row, line_no, n)?;
        row_count += 1;
    }

    if row_count != n {
        return Err(ParseGridError::InvalidLineCount {
            expected: n,
            found: row_count,
        });
    }
    Ok(grid)
}

fn fill_row(
    grid: &mut Grid,
    row: usize,
    chars: &str,
    line_no: usize,
    n: usize,
) -> Result<(), ParseGridError> {
    if chars.len() != n {
        return Err(ParseGridError::InvalidLineLength {
            line: line_no,
            expected: n,
            found: chars.len(),
        });
    }
    for (col, ch) in chars.chars().enumerate() {
        let value = if ch == BLANK {
            Pset::full(n)
        } else {
            let value = Pset::of_char(ch, n);
            if value == Pset::EMPTY {
                return Err(ParseGridError::InvalidChar { line: line_no, ch });
            }
            value
        };
        grid.set(row, col, value);
    }
    Ok(())
}

/// Strips whitespace and `#`-comments, and yields `(1-based line number,
/// cell characters)` for every non-empty data line.
fn data_lines(text: &str) -> Vec<(usize, String)> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim_start();
            let content = trimmed.split('#').next().unwrap_or("");
            let cells: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.is_empty() {
                None
            } else {
                Some((i + 1, cells))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_color_grid() {
        // n=1 has exactly one valid color, the first alphabet character.
        let grid = parse("1\n").unwrap();
        assert_eq!(grid.n(), 1);
        assert_eq!(grid.get(0, 0).to_string(1), "1");
    }

    #[test]
    fn parses_a_grid_without_a_trailing_newline() {
        let grid = parse("1").unwrap();
        assert_eq!(grid.n(), 1);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let text = "# a comment\n\n1234\n3412\n2143\n4321\n";
        let grid = parse(text).unwrap();
        assert_eq!(grid.n(), 4);
        assert_eq!(grid.get(0, 0).to_string(4), "1");
    }

    #[test]
    fn ignores_inline_whitespace() {
        let text = "1 2 3 4\n3 4 1 2\n2 1 4 3\n4 3 2 1\n";
        let grid = parse(text).unwrap();
        assert_eq!(grid.n(), 4);
    }

    #[test]
    fn rejects_a_bad_character() {
        let err = parse("12#x\n34\n").unwrap_err();
        // `#` truncates the line to "12", which is too short for n=2... but
        // 2 is not an allowed size, so size is rejected first.
        assert!(matches!(err, ParseGridError::InvalidSize { size: 2 }));
    }

    #[test]
    fn rejects_an_invalid_character_at_the_right_size() {
        let err = parse("123x\n1234\n1234\n1234\n").unwrap_err();
        assert_eq!(
            err,
            ParseGridError::InvalidChar { line: 1, ch: 'x' }
        );
    }

    #[test]
    fn rejects_a_mismatched_line_length() {
        let err = parse("1234\n123\n1234\n1234\n").unwrap_err();
        assert_eq!(
            err,
            ParseGridError::InvalidLineLength {
                line: 2,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_too_few_lines() {
        let err = parse("1234\n3412\n").unwrap_err();
        assert_eq!(
            err,
            ParseGridError::InvalidLineCount {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_too_many_lines() {
        let err = parse("1234\n3412\n2143\n4321\n1234\n").unwrap_err();
        assert_eq!(
            err,
            ParseGridError::InvalidLineCount {
                expected: 4,
                found: 5
            }
        );
    }

    #[test]
    fn blank_cells_become_full_candidate_sets() {
        let grid = parse("12_4\n1234\n1234\n1234\n").unwrap();
        assert_eq!(grid.get(0, 2), Pset::full(4));
    }
}
