//! Pawn pushes, captures, en-passant and promotions for the side to move.

use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::moves::leaper_attacks::pawn_attacks;

pub fn generate_pawn_moves(position: &Position, out: &mut Vec<ChessMove>) {
    let side = position.side_to_move;
    let enemy_occ = position.occupancy_by_color[side.opposite().index()];
    let empty = !position.occupancy_all;
    let (start_rank, promotion_rank) = match side {
        Color::White => (1, 7),
        Color::Black => (6, 0),
    };
    let ep_target = position.en_passant_square.map(square_bit).unwrap_or(0);

    let mut pawns = position.pieces[side.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        // Pawns never stand on their promotion rank, so one step is on board.
        let one_step = match side {
            Color::White => from + 8,
            Color::Black => from - 8,
        };

        if square_bit(one_step) & empty != 0 {
            push_pawn_move(out, from, one_step, promotion_rank);

            if rank_of(from) == start_rank {
                let two_step = match side {
                    Color::White => from + 16,
                    Color::Black => from - 16,
                };
                if square_bit(two_step) & empty != 0 {
                    out.push(ChessMove::new(from, two_step));
                }
            }
        }

        let mut targets = pawn_attacks(side, from) & (enemy_occ | ep_target);
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            push_pawn_move(out, from, to, promotion_rank);
        }
    }
}

fn push_pawn_move(out: &mut Vec<ChessMove>, from: Square, to: Square, promotion_rank: u8) {
    if rank_of(to) == promotion_rank {
        out.extend(
            PieceKind::PROMOTIONS
                .iter()
                .map(|&piece| ChessMove::with_promotion(from, to, piece)),
        );
    } else {
        out.push(ChessMove::new(from, to));
    }
}
