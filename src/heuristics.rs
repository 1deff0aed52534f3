use crate::engine::Board;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Cost estimates available to the informed searches.
///
/// All four are admissible lower bounds on the number of moves to the goal, and all
/// evaluate to `0` on the goal board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Sum of row and column offsets of every tile from its goal cell.
    Manhattan,
    /// Sum of straight-line offsets. Never larger than `Manhattan`.
    Euclidean,
    /// `Manhattan` plus two moves per tile that must leave its row or column to let another
    /// tile in the same line past.
    LinearConflict,
    /// Number of tiles not on their goal cell.
    MisplacedTiles,
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::LinearConflict,
        Heuristic::MisplacedTiles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::LinearConflict => "linear-conflict",
            Heuristic::MisplacedTiles => "misplaced-tiles",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Heuristic::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown heuristic '{}'", s))
    }
}

/// Evaluates heuristic `kind` on `board`.
///
/// The integer heuristics are returned as exact `f64` values so that all four share one
/// frontier ordering.
pub fn evaluate(board: &Board, kind: Heuristic) -> f64 {
    match kind {
        Heuristic::Manhattan => manhattan_distance(board) as f64,
        Heuristic::Euclidean => euclidean_distance(board),
        Heuristic::LinearConflict => linear_conflict(board) as f64,
        Heuristic::MisplacedTiles => misplaced_tiles(board) as f64,
    }
}

/// Iterates `(row, col, goal_row, goal_col)` for every non-blank tile.
fn offsets(board: &Board) -> impl Iterator<Item = (usize, usize, usize, usize)> + '_ {
    let n = board.size();
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t != 0)
        .map(move |(i, &t)| {
            let (goal_r, goal_c) = board.goal_position(t);
            (i / n, i % n, goal_r, goal_c)
        })
}

/// Sums `|row - goal_row| + |col - goal_col|` over the non-blank tiles.
///
/// Every move changes exactly one tile's distance by exactly one, so this is admissible and
/// consistent.
pub fn manhattan_distance(board: &Board) -> u32 {
    offsets(board)
        .map(|(r, c, gr, gc)| (r.abs_diff(gr) + c.abs_diff(gc)) as u32)
        .sum()
}

/// Sums the straight-line distance from each non-blank tile to its goal cell.
pub fn euclidean_distance(board: &Board) -> f64 {
    offsets(board)
        .map(|(r, c, gr, gc)| {
            let dr = r.abs_diff(gr) as f64;
            let dc = c.abs_diff(gc) as f64;
            (dr * dr + dc * dc).sqrt()
        })
        .sum()
}

/// Counts non-blank tiles that are not on their goal cell.
pub fn misplaced_tiles(board: &Board) -> u32 {
    offsets(board)
        .filter(|&(r, c, gr, gc)| (r, c) != (gr, gc))
        .count() as u32
}

/// Returns the fewest tiles that must leave a line so the remaining ones are in goal order.
///
/// `goal_order` holds, in board order, the goal coordinate along the line of each tile that
/// belongs in this line. The tiles that can stay form a longest increasing subsequence.
fn line_conflicts(goal_order: &[usize]) -> u32 {
    if goal_order.len() < 2 {
        return 0;
    }
    let mut longest = vec![1usize; goal_order.len()];
    for i in 1..goal_order.len() {
        for j in 0..i {
            if goal_order[j] < goal_order[i] && longest[j] + 1 > longest[i] {
                longest[i] = longest[j] + 1;
            }
        }
    }
    let keep = longest.iter().copied().max().unwrap_or(0);
    (goal_order.len() - keep) as u32
}

/// Number of linear conflicts on the board, rows and columns counted independently.
///
/// Two tiles are in conflict when they sit in their shared goal row (or column) but in
/// reversed order. A line holding only pairwise conflicts counts one per pair; in lines
/// where several tiles are mutually reversed, each tile that has to step out of the line
/// counts once.
///
/// This is not the pairwise count found in many write-ups. A fully reversed row such as
/// `4 3 2 1` holds six reversed pairs but counts 3, since three tiles leaving the row lets
/// the fourth stay put. Counting pairs there would add 12 to Manhattan and overestimate.
pub fn count_linear_conflicts(board: &Board) -> u32 {
    let n = board.size();
    let mut conflicts = 0;

    for line in 0..n {
        // Row `line`: tiles whose goal row is this row, in column order.
        let row: Vec<usize> = (0..n)
            .map(|c| board.get_tile(line, c))
            .filter(|&t| t != 0)
            .map(|t| board.goal_position(t))
            .filter(|&(gr, _)| gr == line)
            .map(|(_, gc)| gc)
            .collect();
        conflicts += line_conflicts(&row);

        // Column `line`: tiles whose goal column is this column, in row order.
        let col: Vec<usize> = (0..n)
            .map(|r| board.get_tile(r, line))
            .filter(|&t| t != 0)
            .map(|t| board.goal_position(t))
            .filter(|&(_, gc)| gc == line)
            .map(|(gr, _)| gr)
            .collect();
        conflicts += line_conflicts(&col);
    }

    conflicts
}

/// Manhattan distance plus two moves per linear conflict.
pub fn linear_conflict(board: &Board) -> u32 {
    manhattan_distance(board) + 2 * count_linear_conflicts(board)
}

/// Snapshot of every estimate for one board, as shown by the interactive player's
/// analysis command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    pub puzzle: String,
    pub solvable: bool,
    pub inversions: usize,
    pub manhattan_distance: u32,
    pub euclidean_distance: f64,
    pub linear_conflict: u32,
    pub misplaced_tiles: u32,
}

pub fn analyze(board: &Board) -> Analysis {
    Analysis {
        puzzle: board.puzzle_name(),
        solvable: board.is_solvable(),
        inversions: crate::solvability::count_inversions(board),
        manhattan_distance: manhattan_distance(board),
        euclidean_distance: euclidean_distance(board),
        linear_conflict: linear_conflict(board),
        misplaced_tiles: misplaced_tiles(board),
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzle:             {}", self.puzzle)?;
        writeln!(f, "Solvable:           {}", self.solvable)?;
        writeln!(f, "Inversions:         {}", self.inversions)?;
        writeln!(f, "Manhattan distance: {}", self.manhattan_distance)?;
        writeln!(f, "Euclidean distance: {:.2}", self.euclidean_distance)?;
        writeln!(f, "Linear conflict:    {}", self.linear_conflict)?;
        write!(f, "Misplaced tiles:    {}", self.misplaced_tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn board(rows: &[[u8; 3]; 3]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_goal_scores_zero_for_every_heuristic() {
        for n in 3..=6 {
            let goal = Board::goal(n).unwrap();
            for kind in Heuristic::ALL {
                assert_eq!(evaluate(&goal, kind), 0.0, "{kind} on goal of size {n}");
            }
        }
    }

    #[test]
    fn test_one_move_board() {
        let b = board(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]);
        assert_eq!(manhattan_distance(&b), 1);
        assert_eq!(euclidean_distance(&b), 1.0);
        assert_eq!(misplaced_tiles(&b), 1);
        assert_eq!(linear_conflict(&b), 1);
    }

    #[test]
    fn test_manhattan_known_value() {
        let b = board(&[[8, 1, 3], [4, 0, 2], [7, 6, 5]]);
        // 8:(0,0)->(2,1)=3, 1:(0,1)->(0,0)=1, 2:(1,2)->(0,1)=2, 6:(2,1)->(1,2)=2, 5:(2,2)->(1,1)=2
        assert_eq!(manhattan_distance(&b), 10);
        assert_eq!(misplaced_tiles(&b), 5);
    }

    #[test]
    fn test_euclidean_diagonal() {
        let b = board(&[[1, 2, 3], [4, 8, 6], [7, 5, 0]]);
        // 8 sits at (1,1), goal (2,1): 1.0; 5 sits at (2,1), goal (1,1): 1.0
        assert!((euclidean_distance(&b) - 2.0).abs() < 1e-9);

        let b = board(&[[5, 2, 3], [4, 1, 6], [7, 8, 0]]);
        // 5 at (0,0) goal (1,1), 1 at (1,1) goal (0,0): sqrt(2) each
        assert!((euclidean_distance(&b) - 2.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_linear_conflict_pair_in_row() {
        // 2 and 1 are both in goal row 0 but reversed.
        let b = board(&[[2, 1, 3], [4, 5, 6], [7, 8, 0]]);
        assert_eq!(count_linear_conflicts(&b), 1);
        assert_eq!(linear_conflict(&b), manhattan_distance(&b) + 2);
    }

    #[test]
    fn test_linear_conflict_pair_in_column() {
        let b = board(&[[4, 2, 3], [1, 5, 6], [7, 8, 0]]);
        assert_eq!(count_linear_conflicts(&b), 1);
        assert_eq!(linear_conflict(&b), 4);
    }

    #[test]
    fn test_linear_conflict_reversed_row_counts_tiles_to_remove() {
        // 3 2 1 needs two tiles out of the row, not three pairwise detours.
        let b = board(&[[3, 2, 1], [4, 5, 6], [7, 8, 0]]);
        assert_eq!(count_linear_conflicts(&b), 2);
        assert_eq!(linear_conflict(&b), 4 + 4);
    }

    #[test]
    fn test_fully_reversed_line_counts_tiles_not_pairs() {
        assert_eq!(line_conflicts(&[1, 0]), 1);
        assert_eq!(line_conflicts(&[3, 2, 1, 0]), 3);
        assert_eq!(line_conflicts(&[1, 0, 3, 2]), 2);

        // Six reversed pairs in the top row, but only three tiles have to leave it.
        let b = Board::from_rows(&[
            [4, 3, 2, 1],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 14, 15, 0],
        ])
        .unwrap();
        assert_eq!(manhattan_distance(&b), 8);
        assert_eq!(count_linear_conflicts(&b), 3);
        assert_eq!(linear_conflict(&b), 8 + 6);
    }

    #[test]
    fn test_linear_conflict_ignores_tiles_from_other_lines() {
        // 4 is in row 0 but belongs to row 1, so it cannot conflict with 1.
        let b = board(&[[4, 1, 3], [0, 5, 6], [7, 8, 2]]);
        assert_eq!(count_linear_conflicts(&b), 0);
    }

    #[test]
    fn test_heuristic_ordering_on_random_boards() {
        let mut rng = SmallRng::seed_from_u64(2024);
        for _ in 0..300 {
            let n = rng.gen_range(3..=5);
            let b = Board::new_random_with_seed(n, rng.gen()).unwrap();
            let manhattan = manhattan_distance(&b);
            assert!(linear_conflict(&b) >= manhattan, "{b}");
            assert!(euclidean_distance(&b) <= manhattan as f64 + 1e-9, "{b}");
            assert!(misplaced_tiles(&b) <= manhattan, "{b}");
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            "linear-conflict".parse::<Heuristic>().unwrap(),
            Heuristic::LinearConflict
        );
        assert_eq!("Manhattan".parse::<Heuristic>().unwrap(), Heuristic::Manhattan);
        assert!("chebyshev".parse::<Heuristic>().is_err());
        assert_eq!(Heuristic::MisplacedTiles.to_string(), "misplaced-tiles");
    }

    #[test]
    fn test_analyze() {
        let b = board(&[[1, 2, 3], [4, 5, 6], [8, 7, 0]]);
        let analysis = analyze(&b);
        assert_eq!(analysis.puzzle, "8-Puzzle");
        assert!(!analysis.solvable);
        assert_eq!(analysis.inversions, 1);
        assert_eq!(analysis.manhattan_distance, 2);
        assert_eq!(analysis.linear_conflict, 4);
        assert_eq!(analysis.misplaced_tiles, 2);
        assert!(analysis.to_string().contains("Solvable:           false"));
    }
}
