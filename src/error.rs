//! Error type shared by the board model, the parsers and the binaries.
//!
//! Search outcomes such as an exhausted state space or a blown budget are not
//! errors; they are reported through `solver::SearchStatus`.

use crate::engine::Move;

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// The grid is not a permutation of `0..n*n` for a supported dimension.
    #[error("invalid grid: {reason}")]
    InvalidGrid { reason: String },

    /// The blank cannot move in the requested direction.
    #[error("illegal move {direction}: blank at ({row}, {col}) would leave the board")]
    IllegalMove {
        direction: Move,
        row: usize,
        col: usize,
    },

    /// The clicked tile does not touch the blank.
    #[error("tile at ({row}, {col}) is not adjacent to the blank")]
    NotAdjacent { row: usize, col: usize },

    /// A direction name that is not one of up, down, left or right.
    #[error("unknown move '{input}'")]
    UnknownMove { input: String },

    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("failed to read board file: {0}")]
    Io(#[from] std::io::Error),
}

impl PuzzleError {
    pub(crate) fn invalid_grid(reason: impl Into<String>) -> Self {
        PuzzleError::InvalidGrid {
            reason: reason.into(),
        }
    }
}
