//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal pawn and piece moves, plays each one, and keeps
//! those that do not leave the mover's own king attacked.

use crate::game_state::chess_move::ChessMove;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::apply_unchecked;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::generate_piece_moves;

/// Pseudo-legal moves for the side to move, in generation order.
pub fn generate_pseudo_legal_moves(position: &Position) -> Vec<ChessMove> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pawn_moves(position, &mut pseudo);
    generate_piece_moves(position, &mut pseudo);
    pseudo
}

/// Legal moves for the side to move, paired with the position they lead to.
pub fn generate_legal_successors(position: &Position) -> Vec<(ChessMove, Position)> {
    let mover = position.side_to_move;
    generate_pseudo_legal_moves(position)
        .into_iter()
        .filter_map(|mv| {
            let next = apply_unchecked(position, mv);
            (!is_king_in_check(&next, mover)).then_some((mv, next))
        })
        .collect()
}

/// Legal moves for the side to move.
pub fn generate_legal_moves(position: &Position) -> Vec<ChessMove> {
    generate_legal_successors(position)
        .into_iter()
        .map(|(mv, _)| mv)
        .collect()
}
