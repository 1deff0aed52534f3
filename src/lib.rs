//! # N-Puzzle Solver Library
//!
//! This library provides the board model for the sliding tile puzzle (8-puzzle,
//! 15-puzzle and larger square variants) together with a family of search algorithms
//! that find move sequences leading to the solved layout.
//!
//! It is used by three binaries:
//! - `human_player`: Interactive play on the command line, with undo and solver hints.
//! - `ai_solver`: Reads a board from a file and prints a solution and search statistics.
//! - `heuristic_evaluator`: Runs algorithm/heuristic combinations over seeded scrambles
//!   and reports average effort.
//!
//! ## Modules
//! - `engine`: Board representation (`Board`), moves (`Move`), board generators and the
//!   interactive session (`Game`).
//! - `solvability`: Inversion counting and the parity test for reachability of the goal.
//! - `heuristics`: Manhattan, Euclidean, Linear Conflict and Misplaced Tiles estimates.
//! - `solver`: Breadth-first, depth-first, A*, greedy best-first and IDA* search with
//!   budgets and statistics.
//! - `worker`: Background and parallel execution of searches.
//! - `error`: The `PuzzleError` type.
//! - `utils`: Parsing boards from text and formatting move sequences.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod solvability;
pub mod solver;
pub mod utils;
pub mod worker;
