//! Core board model for the sliding tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Move`: The four directions the blank can travel in.
//! - `Board`: An immutable snapshot of tile positions with goal test, move generation
//!   and seeded board generators (scrambles and uniform shuffles).
//! - `Game`: Manages an interactive session, including move count, undo history,
//!   solution playback and a log of the solver runs performed during the session.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;
use crate::heuristics::{self, Heuristic};
use crate::solvability;
use crate::solver::{self, Algorithm, SearchReport, SearchStats, SolverConfig};

/// Smallest supported board dimension.
pub const MIN_DIMENSION: usize = 3;
/// Largest supported board dimension. Tiles are stored as `u8`, so `16 * 16 - 1` is the
/// largest tile value that fits.
pub const MAX_DIMENSION: usize = 16;

/// A direction the blank moves in.
///
/// `Up` moves the blank one row towards the top of the board, which slides the tile
/// above it down into the vacated cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in generation order. Uninformed searches depend on this order being fixed.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Row and column delta applied to the blank.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// The move that undoes this one.
    pub fn opposite(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Upper-case label used in move listings, e.g. `"UP"`.
    pub fn label(self) -> &'static str {
        match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Move {
    type Err = PuzzleError;

    /// Accepts the full label in any case (`"up"`, `"UP"`) or its first letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" | "U" => Ok(Move::Up),
            "DOWN" | "D" => Ok(Move::Down),
            "LEFT" | "L" => Ok(Move::Left),
            "RIGHT" | "R" => Ok(Move::Right),
            _ => Err(PuzzleError::UnknownMove {
                input: s.trim().to_string(),
            }),
        }
    }
}

/// Represents one configuration of the puzzle as a flat, row-major grid.
///
/// A `Board` is always a permutation of `0..n*n` where `0` is the blank; the
/// constructors reject anything else. Boards never change after construction:
/// every move produces a new `Board`. Equality and hashing depend on the grid only,
/// so two boards reached along different paths deduplicate in visited sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<u8>,
    blank: usize,
}

impl Board {
    /// Creates a board from a flat row-major tile list.
    ///
    /// # Arguments
    /// * `tiles`: `size * size` values forming a permutation of `0..size * size`.
    /// * `size`: The board dimension `n`, between `MIN_DIMENSION` and `MAX_DIMENSION`.
    ///
    /// # Returns
    /// * `Ok(Board)` for a valid permutation.
    /// * `Err(PuzzleError::InvalidGrid)` if the dimension is unsupported, the length is
    ///   wrong, or a value is out of range, duplicated or missing.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Board;
    /// let board = Board::new(vec![1, 2, 3, 4, 5, 6, 7, 0, 8], 3).unwrap();
    /// assert_eq!(board.blank_position(), (2, 1));
    /// assert!(Board::new(vec![1, 1, 3, 4, 5, 6, 7, 0, 8], 3).is_err());
    /// ```
    pub fn new(tiles: Vec<u8>, size: usize) -> Result<Self, PuzzleError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&size) {
            return Err(PuzzleError::invalid_grid(format!(
                "dimension {} is outside the supported range {}..={}",
                size, MIN_DIMENSION, MAX_DIMENSION
            )));
        }
        let cells = size * size;
        if tiles.len() != cells {
            return Err(PuzzleError::invalid_grid(format!(
                "expected {} tiles for a {}x{} board, found {}",
                cells,
                size,
                size,
                tiles.len()
            )));
        }

        let mut seen = vec![false; cells];
        for &tile in &tiles {
            let value = tile as usize;
            if value >= cells {
                return Err(PuzzleError::invalid_grid(format!(
                    "tile {} is out of range 0..{}",
                    tile, cells
                )));
            }
            if seen[value] {
                return Err(PuzzleError::invalid_grid(format!("tile {} appears twice", tile)));
            }
            seen[value] = true;
        }
        if let Some(missing) = seen.iter().position(|&present| !present) {
            return Err(PuzzleError::invalid_grid(format!("tile {} is missing", missing)));
        }

        let blank = tiles
            .iter()
            .position(|&t| t == 0)
            .ok_or_else(|| PuzzleError::invalid_grid("board has no blank"))?;
        Ok(Board { size, tiles, blank })
    }

    /// Creates a board from a slice of rows.
    ///
    /// The board must be square: as many rows as each row has tiles.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Board;
    /// let board = Board::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 8, 0]]).unwrap();
    /// assert!(board.is_goal());
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[u8; N]]) -> Result<Self, PuzzleError> {
        if rows.len() != N {
            return Err(PuzzleError::invalid_grid(format!(
                "expected {} rows of {} tiles, found {} rows",
                N,
                N,
                rows.len()
            )));
        }
        Board::new(rows.concat(), N)
    }

    /// Returns the solved board for dimension `size`: `1..n*n-1` row-major with the blank last.
    pub fn goal(size: usize) -> Result<Self, PuzzleError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&size) {
            return Err(PuzzleError::invalid_grid(format!(
                "dimension {} is outside the supported range {}..={}",
                size, MIN_DIMENSION, MAX_DIMENSION
            )));
        }
        Ok(Self::goal_unchecked(size))
    }

    fn goal_unchecked(size: usize) -> Self {
        let cells = size * size;
        let tiles = (0..cells)
            .map(|i| if i == cells - 1 { 0 } else { (i + 1) as u8 })
            .collect();
        Board {
            size,
            tiles,
            blank: cells - 1,
        }
    }

    /// Scrambles the goal board with a random walk of the blank.
    ///
    /// The walk never immediately undoes its previous step, so `moves` is an upper bound on
    /// the optimal solution length. Boards produced this way are always solvable, and the
    /// same `(size, moves, seed)` always yields the same board.
    pub fn scrambled(size: usize, moves: usize, seed: u64) -> Result<Self, PuzzleError> {
        let mut board = Board::goal(size)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut last: Option<Move> = None;

        for _ in 0..moves {
            let candidates: Vec<Move> = board
                .legal_moves()
                .filter(|m| last.map_or(true, |prev| *m != prev.opposite()))
                .collect();
            let Some(&mv) = candidates.choose(&mut rng) else {
                break;
            };
            board = board.apply_move(mv)?;
            last = Some(mv);
        }
        Ok(board)
    }

    /// Creates a uniformly shuffled board. Roughly half of these boards are unsolvable.
    pub fn new_random_with_seed(size: usize, seed: u64) -> Result<Self, PuzzleError> {
        let mut tiles = Board::goal(size)?.tiles;
        let mut rng = SmallRng::seed_from_u64(seed);
        tiles.shuffle(&mut rng);
        Board::new(tiles, size)
    }

    /// Creates a uniformly shuffled board that is guaranteed to be solvable.
    ///
    /// When the shuffle lands in the unsolvable half, swapping two non-blank tiles flips the
    /// inversion parity and moves it into the solvable half.
    pub fn random_solvable(size: usize, seed: u64) -> Result<Self, PuzzleError> {
        let board = Board::new_random_with_seed(size, seed)?;
        if board.is_solvable() {
            return Ok(board);
        }
        let mut tiles = board.tiles;
        let mut non_blank = (0..tiles.len()).filter(|&i| tiles[i] != 0);
        if let (Some(a), Some(b)) = (non_blank.next(), non_blank.next()) {
            tiles.swap(a, b);
        }
        Board::new(tiles, size)
    }

    /// Returns the board dimension `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the tiles in row-major order.
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is not below `size()`.
    pub fn get_tile(&self, r: usize, c: usize) -> u8 {
        assert!(r < self.size && c < self.size, "({}, {}) is off the board", r, c);
        self.tiles[r * self.size + c]
    }

    /// Iterates over the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.tiles.chunks(self.size)
    }

    /// Returns the `(row, col)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Returns the `(row, col)` that `tile` occupies in the goal layout.
    ///
    /// The blank's goal cell is the bottom-right corner.
    pub fn goal_position(&self, tile: u8) -> (usize, usize) {
        if tile == 0 {
            return (self.size - 1, self.size - 1);
        }
        let index = tile as usize - 1;
        (index / self.size, index % self.size)
    }

    /// Human readable name of the puzzle family, e.g. `"8-Puzzle"` for a 3x3 board.
    pub fn puzzle_name(&self) -> String {
        format!("{}-Puzzle", self.size * self.size - 1)
    }

    /// Checks whether this board is the goal layout for its dimension.
    pub fn is_goal(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &t)| if i == last { t == 0 } else { t as usize == i + 1 })
    }

    /// Checks whether the goal is reachable from this board. See `solvability`.
    pub fn is_solvable(&self) -> bool {
        solvability::is_solvable(self)
    }

    /// Evaluates one of the heuristics in `heuristics` on this board.
    pub fn heuristic(&self, kind: Heuristic) -> f64 {
        heuristics::evaluate(self, kind)
    }

    fn target_of(&self, mv: Move) -> Option<usize> {
        let (r, c) = self.blank_position();
        let (dr, dc) = mv.delta();
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if nr < 0 || nc < 0 || nr >= self.size as isize || nc >= self.size as isize {
            return None;
        }
        Some(nr as usize * self.size + nc as usize)
    }

    fn with_blank_at(&self, target: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Board {
            size: self.size,
            tiles,
            blank: target,
        }
    }

    /// Iterates over the moves that keep the blank on the board, in `Move::ALL` order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL
            .into_iter()
            .filter(move |&mv| self.target_of(mv).is_some())
    }

    /// Generates every successor of this board together with the move that produced it.
    ///
    /// Successors are listed in `Move::ALL` order (`UP`, `DOWN`, `LEFT`, `RIGHT`), skipping
    /// moves that would take the blank off the board. There is no wraparound.
    pub fn neighbors(&self) -> Vec<(Board, Move)> {
        Move::ALL
            .into_iter()
            .filter_map(|mv| self.target_of(mv).map(|t| (self.with_blank_at(t), mv)))
            .collect()
    }

    /// Moves the blank one cell in direction `mv`.
    ///
    /// # Returns
    /// * `Ok(Board)` with the blank moved.
    /// * `Err(PuzzleError::IllegalMove)` if the blank would leave the board.
    pub fn apply_move(&self, mv: Move) -> Result<Board, PuzzleError> {
        match self.target_of(mv) {
            Some(target) => Ok(self.with_blank_at(target)),
            None => {
                let (row, col) = self.blank_position();
                Err(PuzzleError::IllegalMove {
                    direction: mv,
                    row,
                    col,
                })
            }
        }
    }

    /// Slides the tile at `(r, c)` into the blank.
    ///
    /// This is the click-driven counterpart of `apply_move`: the tile must be orthogonally
    /// adjacent to the blank. The returned `Move` is the direction the blank travelled.
    pub fn slide_tile(&self, r: usize, c: usize) -> Result<(Board, Move), PuzzleError> {
        if r >= self.size || c >= self.size {
            return Err(PuzzleError::NotAdjacent { row: r, col: c });
        }
        let (br, bc) = self.blank_position();
        let mv = match (r.abs_diff(br), c.abs_diff(bc)) {
            (1, 0) if r < br => Move::Up,
            (1, 0) => Move::Down,
            (0, 1) if c < bc => Move::Left,
            (0, 1) => Move::Right,
            _ => return Err(PuzzleError::NotAdjacent { row: r, col: c }),
        };
        Ok((self.apply_move(mv)?, mv))
    }

    /// Applies `moves` in order, failing on the first illegal one.
    pub fn replay(&self, moves: &[Move]) -> Result<Board, PuzzleError> {
        moves.iter().try_fold(self.clone(), |board, &mv| board.apply_move(mv))
    }
}

impl fmt::Display for Board {
    /// Prints one row per line, right-aligned, with `.` in place of the blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, &tile) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                if tile == 0 {
                    write!(f, "{:>width$}", ".", width = width)?;
                } else {
                    write!(f, "{:>width$}", tile, width = width)?;
                }
            }
        }
        Ok(())
    }
}

/// How hard a shuffled puzzle is, expressed as the length of the scrambling walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn scramble_moves(self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 25,
            Difficulty::Hard => 50,
            Difficulty::Expert => 100,
        }
    }
}

/// The board sizes offered by the interactive player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PuzzleSize {
    #[value(name = "8")]
    Eight,
    #[value(name = "15")]
    Fifteen,
    #[value(name = "24")]
    TwentyFour,
    #[value(name = "35")]
    ThirtyFive,
}

impl PuzzleSize {
    pub fn dimension(self) -> usize {
        match self {
            PuzzleSize::Eight => 3,
            PuzzleSize::Fifteen => 4,
            PuzzleSize::TwentyFour => 5,
            PuzzleSize::ThirtyFive => 6,
        }
    }
}

/// One solver run recorded by a `Game`.
#[derive(Clone, Debug, Serialize)]
pub struct SolveRecord {
    pub algorithm: Algorithm,
    /// `None` for the uninformed algorithms.
    pub heuristic: Option<Heuristic>,
    pub puzzle: String,
    pub difficulty: Option<Difficulty>,
    pub solved: bool,
    pub stats: SearchStats,
}

/// Manages the state and progression of an interactive puzzle session.
///
/// The session owns the current board, counts player moves, keeps boards for undo, and can
/// hold a computed solution that is played back one move at a time.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::{Difficulty, Game};
/// use npuzzle_solver::solver::{Algorithm, SolverConfig};
///
/// let mut game = Game::new(3).unwrap();
/// game.shuffle(Difficulty::Easy, 7).unwrap();
///
/// let report = game.solve(&SolverConfig::new(Algorithm::AStar));
/// assert!(report.is_solved());
/// while game.play_next_move().unwrap().is_some() {}
/// assert!(game.is_solved());
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    moves: u32,
    history: Vec<Board>,
    difficulty: Option<Difficulty>,
    solution: Vec<Move>,
    solution_index: usize,
    solve_log: Vec<SolveRecord>,
}

impl Game {
    /// Creates a session on the solved board of dimension `size`.
    pub fn new(size: usize) -> Result<Self, PuzzleError> {
        Ok(Game::new_with_board(Board::goal(size)?))
    }

    /// Creates a session starting from `board`.
    pub fn new_with_board(board: Board) -> Self {
        Game {
            board,
            moves: 0,
            history: Vec::new(),
            difficulty: None,
            solution: Vec::new(),
            solution_index: 0,
            solve_log: Vec::new(),
        }
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the number of moves made since the last shuffle or reset.
    /// Undone moves are subtracted; played-back solution moves are counted.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn is_solved(&self) -> bool {
        self.board.is_goal()
    }

    /// Returns every solver run performed in this session, oldest first.
    pub fn solve_log(&self) -> &[SolveRecord] {
        &self.solve_log
    }

    /// Returns the solution moves that have not been played back yet.
    pub fn pending_moves(&self) -> &[Move] {
        &self.solution[self.solution_index..]
    }

    fn advance(&mut self, next: Board) {
        let previous = std::mem::replace(&mut self.board, next);
        self.history.push(previous);
        self.moves += 1;
    }

    fn clear_solution(&mut self) {
        self.solution.clear();
        self.solution_index = 0;
    }

    /// Moves the blank in direction `mv`.
    ///
    /// A manual move invalidates any loaded solution, since it was computed for a different
    /// board.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), PuzzleError> {
        let next = self.board.apply_move(mv)?;
        self.advance(next);
        self.clear_solution();
        Ok(())
    }

    /// Slides the tile at `(r, c)` into the blank and returns the blank's direction.
    pub fn slide_tile(&mut self, r: usize, c: usize) -> Result<Move, PuzzleError> {
        let (next, mv) = self.board.slide_tile(r, c)?;
        self.advance(next);
        self.clear_solution();
        Ok(mv)
    }

    /// Undoes the last move.
    ///
    /// # Returns
    /// `false` if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.board = previous;
                self.moves = self.moves.saturating_sub(1);
                self.clear_solution();
                true
            }
            None => false,
        }
    }

    /// Puts the solved board back and clears move count, history and any solution.
    pub fn reset(&mut self) {
        self.board = Board::goal_unchecked(self.board.size());
        self.moves = 0;
        self.history.clear();
        self.difficulty = None;
        self.clear_solution();
    }

    /// Replaces the board with a scramble of the goal for `difficulty`.
    ///
    /// The scramble is a random walk from the goal, so the new board is always solvable.
    pub fn shuffle(&mut self, difficulty: Difficulty, seed: u64) -> Result<(), PuzzleError> {
        self.board = Board::scrambled(self.board.size(), difficulty.scramble_moves(), seed)?;
        self.moves = 0;
        self.history.clear();
        self.difficulty = Some(difficulty);
        self.clear_solution();
        Ok(())
    }

    /// Runs the solver on the current board, records the run in the solve log, and loads
    /// the solution for playback when one is found.
    pub fn solve(&mut self, config: &SolverConfig) -> SearchReport {
        let report = solver::solve(&self.board, config);
        self.solve_log.push(SolveRecord {
            algorithm: config.algorithm,
            heuristic: config
                .algorithm
                .uses_heuristic()
                .then_some(config.heuristic),
            puzzle: self.board.puzzle_name(),
            difficulty: self.difficulty,
            solved: report.is_solved(),
            stats: report.stats.clone(),
        });
        match report.path() {
            Some(path) => self.load_solution(path.to_vec()),
            None => self.clear_solution(),
        }
        report
    }

    /// Loads a move sequence for step-by-step playback with `play_next_move`.
    pub fn load_solution(&mut self, moves: Vec<Move>) {
        self.solution = moves;
        self.solution_index = 0;
    }

    /// Plays the next move of the loaded solution.
    ///
    /// # Returns
    /// * `Ok(Some(move))` after playing a move.
    /// * `Ok(None)` when there is nothing left to play.
    /// * `Err(PuzzleError::IllegalMove)` if the loaded sequence does not fit the board; the
    ///   remaining sequence is discarded.
    pub fn play_next_move(&mut self) -> Result<Option<Move>, PuzzleError> {
        let Some(&mv) = self.solution.get(self.solution_index) else {
            return Ok(None);
        };
        match self.board.apply_move(mv) {
            Ok(next) => {
                self.advance(next);
                self.solution_index += 1;
                Ok(Some(mv))
            }
            Err(e) => {
                self.clear_solution();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    fn one_move_board() -> Board {
        Board::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap()
    }

    #[test]
    fn test_goal_layout() {
        let goal = Board::goal(3).unwrap();
        assert_eq!(goal.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(goal.blank_position(), (2, 2));
        assert!(goal.is_goal());

        let goal4 = Board::goal(4).unwrap();
        assert_eq!(goal4.get_tile(3, 2), 15);
        assert_eq!(goal4.get_tile(3, 3), 0);
        assert!(goal4.is_goal());
    }

    #[test]
    fn test_goal_rejects_unsupported_dimension() {
        assert!(Board::goal(2).is_err());
        assert!(Board::goal(MAX_DIMENSION + 1).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_tile() {
        let err = Board::new(vec![1, 2, 3, 4, 5, 6, 7, 7, 0], 3).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidGrid { .. }));
        assert!(err.to_string().contains("appears twice"));
    }

    #[test]
    fn test_new_rejects_missing_tile_and_wrong_length() {
        let err = Board::new(vec![1, 2, 3, 4, 5, 6, 7, 8], 3).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidGrid { .. }));

        let err = Board::new(vec![1, 2, 3, 4, 5, 6, 7, 9, 0], 3).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_from_rows_rejects_non_square_grid() {
        assert!(matches!(
            Board::from_rows(&[[1, 2, 3], [4, 5, 0]]),
            Err(PuzzleError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_equal_grids_are_equal_and_hash_alike() {
        use std::collections::HashSet;

        let a = one_move_board();
        let b = Board::goal(3).unwrap().apply_move(Move::Left).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let center = Board::from_rows(&[[1, 2, 3], [4, 0, 5], [6, 7, 8]]).unwrap();
        let moves: Vec<Move> = center.neighbors().into_iter().map(|(_, m)| m).collect();
        assert_eq!(moves, Move::ALL.to_vec());

        let corner = Board::from_rows(&[[0, 1, 2], [3, 4, 5], [6, 7, 8]]).unwrap();
        let moves: Vec<Move> = corner.neighbors().into_iter().map(|(_, m)| m).collect();
        assert_eq!(moves, vec![Move::Down, Move::Right]);
    }

    #[test]
    fn test_neighbors_swap_blank() {
        let board = one_move_board();
        let (up, mv) = &board.neighbors()[0];
        assert_eq!(*mv, Move::Up);
        assert_eq!(up.blank_position(), (1, 1));
        assert_eq!(up.get_tile(2, 1), 5);
        // The source board is untouched.
        assert_eq!(board.blank_position(), (2, 1));
    }

    #[test]
    fn test_apply_move_illegal() {
        let goal = Board::goal(3).unwrap();
        let err = goal.apply_move(Move::Down).unwrap_err();
        match err {
            PuzzleError::IllegalMove {
                direction,
                row,
                col,
            } => {
                assert_eq!(direction, Move::Down);
                assert_eq!((row, col), (2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(goal.apply_move(Move::Right).is_err());
        assert!(goal.apply_move(Move::Up).is_ok());
    }

    #[test]
    fn test_move_opposite_round_trip() {
        let board = Board::scrambled(4, 20, 3).unwrap();
        for mv in board.legal_moves().collect::<Vec<_>>() {
            let back = board
                .apply_move(mv)
                .unwrap()
                .apply_move(mv.opposite())
                .unwrap();
            assert_eq!(back, board);
        }
    }

    #[test]
    fn test_slide_tile() {
        let board = one_move_board();
        let (next, mv) = board.slide_tile(2, 2).unwrap();
        assert_eq!(mv, Move::Right);
        assert!(next.is_goal());

        assert!(matches!(
            board.slide_tile(0, 0),
            Err(PuzzleError::NotAdjacent { row: 0, col: 0 })
        ));
    }

    #[test]
    fn test_slide_tile_off_board_is_not_adjacent() {
        let board = one_move_board();
        for (r, c) in [(3, 1), (2, 3), (usize::MAX / 2 + 1, 0), (0, usize::MAX), (usize::MAX, 1)] {
            assert!(
                matches!(
                    board.slide_tile(r, c),
                    Err(PuzzleError::NotAdjacent { row, col }) if (row, col) == (r, c)
                ),
                "({r}, {c}) should not be adjacent"
            );
        }
        let (up, mv) = board.slide_tile(1, 1).unwrap();
        assert_eq!(mv, Move::Up);
        assert_eq!(up.blank_position(), (1, 1));
        let (_, mv) = board.slide_tile(2, 0).unwrap();
        assert_eq!(mv, Move::Left);
    }

    #[test]
    fn test_replay_reaches_goal() {
        let board = Board::from_rows(&[[1, 2, 3], [4, 5, 6], [0, 7, 8]]).unwrap();
        let end = board.replay(&[Move::Right, Move::Right]).unwrap();
        assert!(end.is_goal());
        assert!(board.replay(&[Move::Left]).is_err());
    }

    #[test]
    fn test_move_parse_and_display() {
        assert_eq!("up".parse::<Move>().unwrap(), Move::Up);
        assert_eq!("R".parse::<Move>().unwrap(), Move::Right);
        assert_eq!(Move::Left.to_string(), "LEFT");
        match "sideways".parse::<Move>() {
            Err(PuzzleError::UnknownMove { input }) => assert_eq!(input, "sideways"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_scrambled_is_deterministic_and_solvable() {
        let a = Board::scrambled(4, 40, 99).unwrap();
        let b = Board::scrambled(4, 40, 99).unwrap();
        assert_eq!(a, b);
        assert!(a.is_solvable());

        let c = Board::scrambled(4, 40, 100).unwrap();
        assert_ne!(a, c, "different seeds should give different scrambles");
    }

    #[test]
    fn test_random_solvable() {
        for seed in 0..50 {
            let board = Board::random_solvable(3, seed).unwrap();
            assert!(board.is_solvable(), "seed {seed} produced {board}");
        }
    }

    #[test]
    fn test_display_board_formatting() {
        let board = Board::goal(4).unwrap();
        let text = board.to_string();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.lines().next().unwrap(), " 1  2  3  4");
        assert!(text.ends_with("13 14 15  ."));
    }

    #[test]
    fn test_puzzle_name() {
        assert_eq!(Board::goal(3).unwrap().puzzle_name(), "8-Puzzle");
        assert_eq!(Board::goal(6).unwrap().puzzle_name(), "35-Puzzle");
    }

    #[test]
    fn test_game_moves_and_undo() {
        let board = board_from_str_array(&["1 2 3", "4 5 6", "0 7 8"]).unwrap();
        let mut game = Game::new_with_board(board.clone());

        game.apply_move(Move::Right).unwrap();
        assert_eq!(game.slide_tile(2, 2).unwrap(), Move::Right);
        assert!(game.is_solved());
        assert_eq!(game.moves(), 2);

        assert!(game.undo_last_move());
        assert!(game.undo_last_move());
        assert_eq!(game.board(), &board);
        assert_eq!(game.moves(), 0);
        assert!(!game.undo_last_move(), "undo on the initial board should fail");
    }

    #[test]
    fn test_game_illegal_move_leaves_state() {
        let mut game = Game::new(3).unwrap();
        assert!(game.apply_move(Move::Down).is_err());
        assert!(game.slide_tile(0, 0).is_err());
        assert!(game.slide_tile(7, 7).is_err());
        assert_eq!(game.moves(), 0);
        assert!(game.is_solved());
    }

    #[test]
    fn test_game_shuffle_and_reset() {
        let mut game = Game::new(4).unwrap();
        game.shuffle(Difficulty::Medium, 11).unwrap();
        assert_eq!(game.difficulty(), Some(Difficulty::Medium));
        assert!(game.board().is_solvable());
        assert_eq!(game.moves(), 0);

        game.reset();
        assert!(game.is_solved());
        assert_eq!(game.difficulty(), None);
    }

    #[test]
    fn test_game_solution_playback() {
        let mut game = Game::new_with_board(one_move_board());
        game.load_solution(vec![Move::Right]);
        assert_eq!(game.pending_moves(), &[Move::Right]);
        assert_eq!(game.play_next_move().unwrap(), Some(Move::Right));
        assert_eq!(game.play_next_move().unwrap(), None);
        assert!(game.is_solved());
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_game_bad_solution_is_discarded() {
        let mut game = Game::new(3).unwrap();
        game.load_solution(vec![Move::Down, Move::Up]);
        assert!(game.play_next_move().is_err());
        assert!(game.pending_moves().is_empty());
    }

    #[test]
    fn test_manual_move_clears_solution() {
        let mut game = Game::new_with_board(one_move_board());
        game.load_solution(vec![Move::Right]);
        game.apply_move(Move::Up).unwrap();
        assert!(game.pending_moves().is_empty());
    }

    #[test]
    fn test_game_solve_records_run() {
        let mut game = Game::new(3).unwrap();
        game.shuffle(Difficulty::Easy, 5).unwrap();
        let report = game.solve(&SolverConfig::new(Algorithm::AStar));
        assert!(report.is_solved());

        let log = game.solve_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].algorithm, Algorithm::AStar);
        assert_eq!(log[0].heuristic, Some(Heuristic::Manhattan));
        assert_eq!(log[0].puzzle, "8-Puzzle");
        assert_eq!(log[0].difficulty, Some(Difficulty::Easy));
        assert!(log[0].solved);

        while game.play_next_move().unwrap().is_some() {}
        assert!(game.is_solved());
    }

    #[test]
    fn test_game_solve_uninformed_has_no_heuristic() {
        let mut game = Game::new_with_board(one_move_board());
        game.solve(&SolverConfig::new(Algorithm::BreadthFirst));
        assert_eq!(game.solve_log()[0].heuristic, None);
    }

    #[test]
    fn test_difficulty_scramble_lengths() {
        assert_eq!(Difficulty::Easy.scramble_moves(), 10);
        assert_eq!(Difficulty::Expert.scramble_moves(), 100);
        assert_eq!(PuzzleSize::TwentyFour.dimension(), 5);
    }
}
