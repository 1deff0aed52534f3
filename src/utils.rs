use std::fs;
use std::path::Path;

use crate::engine::{Board, Move};
use crate::error::PuzzleError;

/// Parses one string per row into a `Board`.
///
/// Tiles are decimal numbers separated by whitespace or commas. The blank may be written as
/// `0`, `_` or `.`. The number of rows gives the dimension, and every row must have that many
/// entries.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 2 3", "4 5 6", "7 _ 8"]).unwrap();
/// assert_eq!(board.blank_position(), (2, 1));
/// assert_eq!(board.get_tile(2, 2), 8);
///
/// assert!(board_from_str_array(&["1 2 3", "4 5 6", "7 x 8"]).is_err());
/// assert!(board_from_str_array(&["1 2 3", "4 5 6"]).is_err());
/// ```
pub fn board_from_str_array(rows: &[&str]) -> Result<Board, PuzzleError> {
    let size = rows.len();
    let mut tiles = Vec::with_capacity(size * size);

    for (r, row) in rows.iter().enumerate() {
        let line = r + 1;
        let cells: Vec<&str> = row
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|cell| !cell.is_empty())
            .collect();
        if cells.len() != size {
            return Err(PuzzleError::Parse {
                line,
                reason: format!("expected {} tiles, found {}", size, cells.len()),
            });
        }
        for cell in cells {
            let tile = match cell {
                "_" | "." => 0,
                _ => cell.parse::<u8>().map_err(|_| PuzzleError::Parse {
                    line,
                    reason: format!("unrecognized tile '{}'", cell),
                })?,
            };
            tiles.push(tile);
        }
    }

    Board::new(tiles, size)
}

/// Reads a board from a text file with one row per line. Blank lines and lines starting with
/// `#` are ignored.
pub fn read_board_file(path: &Path) -> Result<Board, PuzzleError> {
    let contents = fs::read_to_string(path)?;
    parse_board(&contents)
}

/// Parses the contents of a board file. See `read_board_file`.
pub fn parse_board(contents: &str) -> Result<Board, PuzzleError> {
    let rows: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    board_from_str_array(&rows)
}

/// Formats a move sequence as `UP RIGHT RIGHT`, or `(none)` for an empty path.
pub fn format_path(moves: &[Move]) -> String {
    if moves.is_empty() {
        return "(none)".to_string();
    }
    moves
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compact form using one letter per move, e.g. `URRD`.
pub fn format_path_compact(moves: &[Move]) -> String {
    moves
        .iter()
        .filter_map(|mv| mv.label().chars().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&["1 2 3", "4 5 6", "7 8 0"]).unwrap();
        assert!(board.is_goal());
        assert_eq!(board.size(), 3);
    }

    #[test]
    fn test_board_from_str_array_commas_and_blank_markers() {
        let board = board_from_str_array(&["1,2,3,4", "5,6,7,8", "9,10,11,12", "13,14,15,."])
            .unwrap();
        assert!(board.is_goal());
        let board = board_from_str_array(&["1  2 3", " 4 _ 6 ", "7 5 8"]).unwrap();
        assert_eq!(board.blank_position(), (1, 1));
    }

    #[test]
    fn test_board_from_str_array_invalid_tile() {
        let err = board_from_str_array(&["1 2 3", "4 x 6", "7 8 0"]).unwrap_err();
        match err {
            PuzzleError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("'x'"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_board_from_str_array_row_length_mismatch() {
        let err = board_from_str_array(&["1 2 3", "4 5 6 9", "7 8 0"]).unwrap_err();
        assert!(matches!(err, PuzzleError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_board_from_str_array_rejects_bad_permutation() {
        let err = board_from_str_array(&["1 2 3", "4 5 6", "7 7 0"]).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidGrid { .. }));
        let err = board_from_str_array(&[]).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidGrid { .. }));
    }

    #[test]
    fn test_parse_board_skips_comments() {
        let contents = "# easy one\n\n1 2 3\n4 5 6\n  7 0 8  \n\n";
        let board = parse_board(contents).unwrap();
        assert_eq!(board.blank_position(), (2, 1));
    }

    #[test]
    fn test_read_board_file_missing() {
        let err = read_board_file(Path::new("/nonexistent/board.txt")).unwrap_err();
        assert!(matches!(err, PuzzleError::Io(_)));
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "(none)");
        assert_eq!(
            format_path(&[Move::Up, Move::Right, Move::Right]),
            "UP RIGHT RIGHT"
        );
        assert_eq!(format_path_compact(&[Move::Down, Move::Left]), "DL");
    }
}
