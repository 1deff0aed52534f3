//! Parity test deciding whether a board can reach the goal.
//!
//! A move of the blank either keeps the inversion count (horizontal moves) or changes it by
//! `n - 1` while changing the blank's row by one (vertical moves). For odd `n` the inversion
//! parity is therefore invariant; for even `n` the parity of `inversions + blank_row` is.
//! Comparing against the goal (no inversions, blank in row `n - 1`) gives the rule below.

use crate::engine::Board;

/// Counts pairs of non-blank tiles that appear in the wrong relative order, reading the
/// board row-major.
pub fn count_inversions(board: &Board) -> usize {
    let tiles: Vec<u8> = board.tiles().iter().copied().filter(|&t| t != 0).collect();
    let mut inversions = 0;
    for (i, &a) in tiles.iter().enumerate() {
        inversions += tiles[i + 1..].iter().filter(|&&b| a > b).count();
    }
    inversions
}

/// Returns `true` if the goal layout is reachable from `board`.
///
/// * odd `n`: solvable iff the inversion count is even.
/// * even `n`: solvable iff `inversions + blank_row` is odd, with `blank_row` counted from
///   the top starting at 0.
pub fn is_solvable(board: &Board) -> bool {
    let inversions = count_inversions(board);
    if board.size() % 2 == 1 {
        inversions % 2 == 0
    } else {
        let (blank_row, _) = board.blank_position();
        (inversions + blank_row) % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Move;

    #[test]
    fn test_goal_has_no_inversions() {
        for n in 3..=6 {
            let goal = Board::goal(n).unwrap();
            assert_eq!(count_inversions(&goal), 0);
            assert!(is_solvable(&goal), "goal of size {n} must be solvable");
        }
    }

    #[test]
    fn test_one_move_from_goal_is_solvable() {
        let board = Board::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
        assert_eq!(count_inversions(&board), 0);
        assert!(is_solvable(&board));
    }

    #[test]
    fn test_swapped_pair_is_unsolvable_odd() {
        let board = Board::from_rows(&[[1, 2, 3], [4, 5, 6], [8, 7, 0]]).unwrap();
        assert_eq!(count_inversions(&board), 1);
        assert!(!is_solvable(&board));
    }

    #[test]
    fn test_fifteen_puzzle_swap_is_unsolvable() {
        // The classic 14-15 swap.
        let board = Board::from_rows(&[
            [1, 2, 3, 4],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 15, 14, 0],
        ])
        .unwrap();
        assert!(!is_solvable(&board));
    }

    #[test]
    fn test_even_board_vertical_move_keeps_solvability() {
        let goal = Board::goal(4).unwrap();
        let up = goal.apply_move(Move::Up).unwrap();
        // Moving the blank up across a row shifts three tiles past tile 12.
        assert_eq!(count_inversions(&up), 3);
        assert!(is_solvable(&up));
    }

    #[test]
    fn test_scrambles_stay_solvable() {
        for seed in 0..40 {
            for n in 3..=5 {
                let board = Board::scrambled(n, 60, seed).unwrap();
                assert!(is_solvable(&board), "scramble of size {n}, seed {seed}");
            }
        }
    }
}
