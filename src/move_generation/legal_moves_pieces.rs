//! Knight, bishop, rook, queen and king steps plus castling.

use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::leaper_attacks::{king_attacks, knight_attacks};
use crate::moves::slider_attacks::{bishop_attacks, queen_attacks, rook_attacks};

/// Every non-pawn move of the side to move, castling included.
pub fn generate_piece_moves(position: &Position, out: &mut Vec<ChessMove>) {
    let occupancy = position.occupancy_all;

    push_targets(position, PieceKind::Knight, out, knight_attacks);
    push_targets(position, PieceKind::Bishop, out, |from| {
        bishop_attacks(from, occupancy)
    });
    push_targets(position, PieceKind::Rook, out, |from| {
        rook_attacks(from, occupancy)
    });
    push_targets(position, PieceKind::Queen, out, |from| {
        queen_attacks(from, occupancy)
    });
    push_targets(position, PieceKind::King, out, king_attacks);

    generate_castling_moves(position, out);
}

fn push_targets(
    position: &Position,
    kind: PieceKind,
    out: &mut Vec<ChessMove>,
    attacks: impl Fn(Square) -> Bitboard,
) {
    let side = position.side_to_move;
    let own_occ = position.occupancy_by_color[side.index()];

    let mut pieces = position.pieces[side.index()][kind.index()];
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        pieces &= pieces - 1;

        let mut targets = attacks(from) & !own_occ;
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            out.push(ChessMove::new(from, to));
        }
    }
}

struct CastlingLane {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    must_be_empty: Bitboard,
    /// Squares the king crosses, its destination included.
    must_be_safe: [Square; 2],
}

const WHITE_LANES: [CastlingLane; 2] = [
    CastlingLane {
        right: CASTLE_WHITE_KINGSIDE,
        king_from: 4,
        king_to: 6,
        must_be_empty: (1 << 5) | (1 << 6),
        must_be_safe: [5, 6],
    },
    CastlingLane {
        right: CASTLE_WHITE_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
        must_be_safe: [3, 2],
    },
];

const BLACK_LANES: [CastlingLane; 2] = [
    CastlingLane {
        right: CASTLE_BLACK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        must_be_empty: (1 << 61) | (1 << 62),
        must_be_safe: [61, 62],
    },
    CastlingLane {
        right: CASTLE_BLACK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
        must_be_safe: [59, 58],
    },
];

fn generate_castling_moves(position: &Position, out: &mut Vec<ChessMove>) {
    let side = position.side_to_move;
    let enemy = side.opposite();
    let king_bb = position.pieces[side.index()][PieceKind::King.index()];
    let rooks = position.pieces[side.index()][PieceKind::Rook.index()];

    let lanes = match side {
        Color::White => &WHITE_LANES,
        Color::Black => &BLACK_LANES,
    };

    for lane in lanes {
        if position.castling_rights & lane.right == 0
            || king_bb & square_bit(lane.king_from) == 0
            || rooks & square_bit(rook_home(lane)) == 0
            || position.occupancy_all & lane.must_be_empty != 0
        {
            continue;
        }

        // Not out of, through, or into check.
        if is_square_attacked(position, lane.king_from, enemy)
            || lane
                .must_be_safe
                .iter()
                .any(|&sq| is_square_attacked(position, sq, enemy))
        {
            continue;
        }

        out.push(ChessMove::new(lane.king_from, lane.king_to));
    }
}

/// Corner the castling rook starts from.
fn rook_home(lane: &CastlingLane) -> Square {
    castling_rook_squares(lane.king_to).0
}

/// `(rook_from, rook_to)` for a king landing on `king_to` while castling.
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        6 => (7, 5),
        2 => (0, 3),
        62 => (63, 61),
        _ => (56, 59),
    }
}
