//! Move-path enumeration used to validate the legal move generator.

use crate::game_state::chess_move::ChessMove;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_generator::generate_legal_successors;

/// Number of leaf positions `depth` plies below `position`.
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let successors = generate_legal_successors(position);
    if depth == 1 {
        return successors.len() as u64;
    }

    successors
        .iter()
        .map(|(_, next)| perft(next, depth - 1))
        .sum()
}

/// Per-root-move leaf counts, sorted by move, for diffing against a
/// reference engine.
pub fn perft_divide(position: &Position, depth: u8) -> Vec<(ChessMove, u64)> {
    let mut split: Vec<(ChessMove, u64)> = generate_legal_successors(position)
        .into_iter()
        .map(|(mv, next)| (mv, perft(&next, depth.saturating_sub(1))))
        .collect();
    split.sort_by_key(|(mv, _)| *mv);
    split
}
