use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};

#[inline]
pub fn king_square(position: &Position, color: Color) -> Option<Square> {
    let kings = position.pieces[color.index()][PieceKind::King.index()];
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(position: &Position, color: Color) -> bool {
    let Some(king_sq) = king_square(position, color) else {
        return false;
    };
    is_square_attacked(position, king_sq, color.opposite())
}

/// Whether any piece of `attacker` attacks `square` on the current board.
pub fn is_square_attacked(position: &Position, square: Square, attacker: Color) -> bool {
    let theirs = &position.pieces[attacker.index()];

    // A pawn of `attacker` hits `square` exactly when a defender pawn on
    // `square` would hit the pawn.
    if pawn_attacks(attacker.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
        return true;
    }
    if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
        return true;
    }
    if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
        return true;
    }

    let queens = theirs[PieceKind::Queen.index()];
    let diagonal = theirs[PieceKind::Bishop.index()] | queens;
    if bishop_attacks(square, position.occupancy_all) & diagonal != 0 {
        return true;
    }
    let straight = theirs[PieceKind::Rook.index()] | queens;
    rook_attacks(square, position.occupancy_all) & straight != 0
}
