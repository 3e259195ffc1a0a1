//! # Tic-Tac-Tier
//!
//! A tier-partitioned rendition of Tic-Tac-Toe: tier `t` holds every board
//! with exactly `t` marks placed (so play only ever moves forward through
//! tiers, never back into one already visited), grounded on GamesmanClassic's
//! `mtttier` game module. Positions within a tier are ranked combinatorially
//! rather than through a generic hashing library: tier `t` fixes the X and O
//! counts (`⌈t/2⌉` and `⌊t/2⌋`, since X moves first), so a board is just a
//! choice of which cells hold X and which of the rest hold O, and those two
//! choices rank as a pair of combination numbers.

use std::collections::HashSet;

use crate::model::{Tier, TierPosition, TierType, Value};
use crate::solver::adapter::{Move, Position, TierGame};

const CELLS: usize = 9;

const ROWS: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Each row permutes the 9 cell indices under one of the board's 8 symmetries
/// (identity, 3 rotations, 4 reflections).
const SYMMETRIES: [[usize; 9]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8],
    [2, 5, 8, 1, 4, 7, 0, 3, 6],
    [8, 7, 6, 5, 4, 3, 2, 1, 0],
    [6, 3, 0, 7, 4, 1, 8, 5, 2],
    [2, 1, 0, 5, 4, 3, 8, 7, 6],
    [0, 3, 6, 1, 4, 7, 2, 5, 8],
    [6, 7, 8, 3, 4, 5, 0, 1, 2],
    [8, 5, 2, 7, 4, 1, 6, 3, 0],
];

/// A cell's contents: empty, or marked by one of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Blank,
    X,
    O,
}

type Board = [Mark; CELLS];

/// Tic-Tac-Tier's game session. Carries no state of its own; every method
/// operates purely on the tier and position passed to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Session;

impl Session {
    pub fn new() -> Self {
        Self
    }
}

impl TierGame for Session {
    fn initial_tier(&self) -> Tier {
        0
    }

    fn initial_position(&self) -> Position {
        0
    }

    fn tier_size(&self, tier: Tier) -> u64 {
        let (xcount, ocount) = mark_counts(tier);
        binomial(CELLS as u64, xcount as u64)
            * binomial((CELLS - xcount) as u64, ocount as u64)
    }

    fn generate_moves(&self, position: TierPosition) -> Vec<Move> {
        if self.primitive(position).is_some() {
            return Vec::new();
        }
        let board = decode(position.tier, position.position);
        (0..CELLS as u64)
            .filter(|&i| board[i as usize] == Mark::Blank)
            .collect()
    }

    fn primitive(&self, position: TierPosition) -> Option<Value> {
        let board = decode(position.tier, position.position);
        if ROWS.iter().any(|row| three_in_a_row(&board, row).is_some()) {
            return Some(Value::Lose(0));
        }
        if board.iter().all(|&m| m != Mark::Blank) {
            return Some(Value::Tie(0));
        }
        None
    }

    fn do_move(&self, position: TierPosition, mv: Move) -> TierPosition {
        let mut board = decode(position.tier, position.position);
        board[mv as usize] = whose_turn(&board);
        let child_tier = position.tier + 1;
        TierPosition::new(child_tier, encode(child_tier, &board))
    }

    fn is_legal_position(&self, position: TierPosition) -> bool {
        let board = decode(position.tier, position.position);
        is_legal_board(&board)
    }

    fn child_tiers(&self, tier: Tier) -> Vec<Tier> {
        if tier < CELLS as Tier {
            vec![tier + 1]
        } else {
            Vec::new()
        }
    }

    fn canonical_position(&self, position: TierPosition) -> Position {
        let board = decode(position.tier, position.position);
        SYMMETRIES
            .iter()
            .map(|symmetry| {
                let mut symmetric_board = [Mark::Blank; CELLS];
                for cell in 0..CELLS {
                    symmetric_board[cell] = board[symmetry[cell]];
                }
                encode(position.tier, &symmetric_board)
            })
            .min()
            .expect("SYMMETRIES is non-empty")
    }

    fn supports_parent_enumeration(&self) -> bool {
        true
    }

    fn canonical_parent_positions(
        &self,
        child: TierPosition,
        parent_tier: Tier,
    ) -> Vec<Position> {
        if child.tier == 0 || parent_tier != child.tier - 1 {
            return Vec::new();
        }
        let board = decode(child.tier, child.position);
        let prev_turn = match whose_turn(&board) {
            Mark::X => Mark::O,
            _ => Mark::X,
        };

        let mut seen = HashSet::new();
        let mut parents = Vec::new();
        for cell in 0..CELLS {
            if board[cell] != prev_turn {
                continue;
            }
            let mut parent_board = board;
            parent_board[cell] = Mark::Blank;
            if !is_legal_board(&parent_board) {
                continue;
            }
            let parent_position = encode(parent_tier, &parent_board);
            let canonical = self.canonical_position(TierPosition::new(
                parent_tier,
                parent_position,
            ));
            if seen.insert(canonical) {
                parents.push(canonical);
            }
        }
        parents
    }

    fn tier_type(&self, tier: Tier) -> TierType {
        if tier >= CELLS as Tier {
            TierType::ImmediateTransition
        } else {
            TierType::LoopFree
        }
    }

    fn tier_name(&self, tier: Tier) -> String {
        format!("tic-tac-tier-{tier}")
    }
}

/* BOARD ENCODING */

/// The number of X and O marks a board at `tier` must contain: X moves
/// first, so it is always one ahead until O catches up.
fn mark_counts(tier: Tier) -> (usize, usize) {
    let tier = tier as usize;
    ((tier + 1) / 2, tier / 2)
}

fn whose_turn(board: &Board) -> Mark {
    let (xcount, ocount) = count_marks(board);
    if xcount == ocount {
        Mark::X
    } else {
        Mark::O
    }
}

fn count_marks(board: &Board) -> (usize, usize) {
    let xcount = board.iter().filter(|&&m| m == Mark::X).count();
    let ocount = board.iter().filter(|&&m| m == Mark::O).count();
    (xcount, ocount)
}

fn three_in_a_row(board: &Board, row: &[usize; 3]) -> Option<Mark> {
    let [a, b, c] = *row;
    if board[a] == board[b] && board[b] == board[c] && board[a] != Mark::Blank {
        Some(board[a])
    } else {
        None
    }
}

fn is_legal_board(board: &Board) -> bool {
    let (xcount, ocount) = count_marks(board);
    if xcount != ocount && xcount != ocount + 1 {
        return false;
    }

    let mut xwin = false;
    let mut owin = false;
    for row in &ROWS {
        match three_in_a_row(board, row) {
            Some(Mark::X) => xwin = true,
            Some(Mark::O) => owin = true,
            _ => {},
        }
    }
    if xwin && owin {
        return false;
    }
    if xwin && xcount != ocount + 1 {
        return false;
    }
    if owin && xcount != ocount {
        return false;
    }
    true
}

/// Encodes `board` as a position within `tier`, given that `board` has the
/// mark counts `tier` implies. The X cells are ranked as a combination of
/// `CELLS` choose `xcount`; the O cells are then ranked as a combination of
/// the remaining cells choose `ocount`; the two ranks are combined by mixed
/// radix.
fn encode(tier: Tier, board: &Board) -> Position {
    let (xcount, ocount) = mark_counts(tier);
    let x_cells: Vec<usize> =
        (0..CELLS).filter(|&c| board[c] == Mark::X).collect();
    let remaining: Vec<usize> =
        (0..CELLS).filter(|&c| board[c] != Mark::X).collect();
    let o_ranks: Vec<usize> = (0..CELLS)
        .filter(|&c| board[c] == Mark::O)
        .map(|c| remaining.iter().position(|&r| r == c).unwrap())
        .collect();

    let x_rank = rank_combination(CELLS, &x_cells);
    let o_rank = rank_combination(remaining.len(), &o_ranks);
    let o_space = binomial(remaining.len() as u64, ocount as u64);
    x_rank * o_space + o_rank
}

fn decode(tier: Tier, position: Position) -> Board {
    let (xcount, ocount) = mark_counts(tier);
    let o_space = binomial((CELLS - xcount) as u64, ocount as u64);
    let x_rank = position / o_space.max(1);
    let o_rank = position % o_space.max(1);

    let mut board = [Mark::Blank; CELLS];
    let x_cells = unrank_combination(CELLS, xcount, x_rank);
    for &cell in &x_cells {
        board[cell] = Mark::X;
    }
    let remaining: Vec<usize> =
        (0..CELLS).filter(|c| !x_cells.contains(c)).collect();
    let o_ranks = unrank_combination(remaining.len(), ocount, o_rank);
    for &r in &o_ranks {
        board[remaining[r]] = Mark::O;
    }
    board
}

/* COMBINATORICS */

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// The lexicographic rank, among ascending `k`-combinations of `0..n`, of
/// `combo` (which must already be sorted ascending).
fn rank_combination(n: usize, combo: &[usize]) -> u64 {
    let k = combo.len();
    let mut rank = 0u64;
    let mut prev = 0usize;
    for (i, &c) in combo.iter().enumerate() {
        for x in prev..c {
            rank += binomial((n - x - 1) as u64, (k - i - 1) as u64);
        }
        prev = c + 1;
    }
    rank
}

/// The inverse of [`rank_combination`]: the `k`-combination of `0..n` at
/// lexicographic `rank`, sorted ascending.
fn unrank_combination(n: usize, k: usize, mut rank: u64) -> Vec<usize> {
    let mut result = Vec::with_capacity(k);
    let mut start = 0usize;
    for i in 0..k {
        let remaining = k - i;
        let mut c = start;
        loop {
            let count = binomial((n - c - 1) as u64, (remaining - 1) as u64);
            if rank < count {
                result.push(c);
                start = c + 1;
                break;
            }
            rank -= count;
            c += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_decodes_to_an_empty_board() {
        let game = Session::new();
        let board = decode(game.initial_tier(), game.initial_position());
        assert!(board.iter().all(|&m| m == Mark::Blank));
    }

    #[test]
    fn encode_decode_round_trips_every_position_in_early_tiers() {
        for tier in 0..=4 {
            let size = Session::new().tier_size(tier);
            for position in 0..size {
                let board = decode(tier, position);
                assert_eq!(encode(tier, &board), position);
            }
        }
    }

    #[test]
    fn a_completed_row_is_a_loss_for_the_player_to_move() {
        // X wins by filling the top row; it becomes O's tier.
        let mut board = [Mark::Blank; CELLS];
        board[0] = Mark::X;
        board[1] = Mark::X;
        board[2] = Mark::X;
        board[3] = Mark::O;
        board[4] = Mark::O;
        let tier = 5;
        let position = encode(tier, &board);
        let game = Session::new();
        assert_eq!(
            game.primitive(TierPosition::new(tier, position)),
            Some(Value::Lose(0))
        );
    }

    #[test]
    fn legal_position_rejects_boards_with_two_winners() {
        let mut board = [Mark::Blank; CELLS];
        board[0] = Mark::X;
        board[1] = Mark::X;
        board[2] = Mark::X;
        board[3] = Mark::O;
        board[4] = Mark::O;
        board[5] = Mark::O;
        assert!(!is_legal_board(&board));
    }

    #[test]
    fn canonical_position_is_stable_under_symmetry() {
        let game = Session::new();
        let mut board = [Mark::Blank; CELLS];
        board[0] = Mark::X;
        let tier = 1;
        let position = encode(tier, &board);

        let mut rotated = [Mark::Blank; CELLS];
        for cell in 0..CELLS {
            rotated[cell] = board[SYMMETRIES[1][cell]];
        }
        let rotated_position = encode(tier, &rotated);

        assert_eq!(
            game.canonical_position(TierPosition::new(tier, position)),
            game.canonical_position(TierPosition::new(tier, rotated_position)),
        );
    }

    #[test]
    fn child_tiers_stop_after_every_cell_is_filled() {
        let game = Session::new();
        assert_eq!(game.child_tiers(9), Vec::<Tier>::new());
        assert_eq!(game.child_tiers(8), vec![9]);
    }
}
