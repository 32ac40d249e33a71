//! Successor-position construction.
//!
//! `apply_unchecked` trusts that the move is at least pseudo-legal for the
//! side to move; special cases are recognised from the board itself.

use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_moves_pieces::castling_rook_squares;

pub fn apply_unchecked(position: &Position, mv: ChessMove) -> Position {
    let ChessMove { from, to, promotion } = mv;
    let from_mask = square_bit(from);
    let to_mask = square_bit(to);

    let mover = position.side_to_move;
    let enemy = mover.opposite();

    let mut next = position.clone();

    let Some((_, moved_piece)) = position.piece_at(from) else {
        return next;
    };
    let captured = position.piece_at(to).map(|(_, piece)| piece);
    let is_en_passant = moved_piece == PieceKind::Pawn
        && captured.is_none()
        && position.en_passant_square == Some(to)
        && file_of(from) != file_of(to);

    next.pieces[mover.index()][moved_piece.index()] &= !from_mask;

    if let Some(piece) = captured {
        next.pieces[enemy.index()][piece.index()] &= !to_mask;
    }
    if is_en_passant {
        // The captured pawn sits beside the mover, on the destination file.
        let victim = match mover {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        next.pieces[enemy.index()][PieceKind::Pawn.index()] &= !square_bit(victim);
    }

    let placed = promotion.unwrap_or(moved_piece);
    next.pieces[mover.index()][placed.index()] |= to_mask;

    if moved_piece == PieceKind::King && from.abs_diff(to) == 2 {
        let (rook_from, rook_to) = castling_rook_squares(to);
        let rooks = &mut next.pieces[mover.index()][PieceKind::Rook.index()];
        *rooks &= !square_bit(rook_from);
        *rooks |= square_bit(rook_to);
    }

    next.castling_rights &= !(rights_lost_by(from) | rights_lost_by(to));

    next.en_passant_square = if moved_piece == PieceKind::Pawn && from.abs_diff(to) == 16 {
        Some((from + to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || captured.is_some() || is_en_passant {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if mover == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy;
    next.recalc_occupancy();
    next
}

/// Castling rights that disappear once anything leaves or lands on `square`.
fn rights_lost_by(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        4 => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        60 => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}
