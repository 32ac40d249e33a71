//! FEN-to-Position parser.
//!
//! Accepts exactly the six standard fields. Ban state never appears in a
//! FEN string; it travels with the action history instead.

use crate::engine_errors::{EngineError, EngineResult};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::utils::algebraic::algebraic_to_square;

const BACK_RANKS: Bitboard = 0xFF00_0000_0000_00FF;

pub fn parse_fen(fen: &str) -> EngineResult<Position> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| EngineError::invalid_fen("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| EngineError::invalid_fen("missing side to move"))?;
    let castling_part = parts
        .next()
        .ok_or_else(|| EngineError::invalid_fen("missing castling rights"))?;
    let en_passant_part = parts
        .next()
        .ok_or_else(|| EngineError::invalid_fen("missing en-passant square"))?;
    let halfmove_part = parts
        .next()
        .ok_or_else(|| EngineError::invalid_fen("missing halfmove clock"))?;
    let fullmove_part = parts
        .next()
        .ok_or_else(|| EngineError::invalid_fen("missing fullmove number"))?;

    if parts.next().is_some() {
        return Err(EngineError::invalid_fen("extra trailing fields"));
    }

    let mut position = Position::new_empty();

    parse_board(board_part, &mut position)?;
    position.side_to_move = parse_side_to_move(side_part)?;
    position.castling_rights = parse_castling_rights(castling_part)?;
    position.en_passant_square = parse_en_passant_square(en_passant_part)?;
    position.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| EngineError::invalid_fen(format!("invalid halfmove clock: {halfmove_part}")))?;
    position.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| EngineError::invalid_fen(format!("invalid fullmove number: {fullmove_part}")))?;

    position.recalc_occupancy();

    if let Some(square) = position.en_passant_square {
        let expected_rank = match position.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        if rank_of(square) != expected_rank {
            return Err(EngineError::invalid_fen(format!(
                "en-passant square {en_passant_part} does not match the side to move"
            )));
        }
        if position.occupancy_all & square_bit(square) != 0 {
            return Err(EngineError::invalid_fen(format!(
                "en-passant square {en_passant_part} is occupied"
            )));
        }
    }

    let pawns = position.pieces[Color::White.index()][PieceKind::Pawn.index()]
        | position.pieces[Color::Black.index()][PieceKind::Pawn.index()];
    if pawns & BACK_RANKS != 0 {
        return Err(EngineError::invalid_fen("pawns cannot stand on the first or last rank"));
    }

    for color in Color::BOTH {
        let kings = position.pieces[color.index()][PieceKind::King.index()].count_ones();
        if kings != 1 {
            return Err(EngineError::invalid_fen(format!(
                "{color} must have exactly one king, found {kings}"
            )));
        }
    }

    Ok(position)
}

fn parse_board(board_part: &str, position: &mut Position) -> EngineResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(EngineError::invalid_fen("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(EngineError::invalid_fen(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as usize;
                continue;
            }

            let (color, piece) = piece_from_fen_char(ch).ok_or_else(|| {
                EngineError::invalid_fen(format!("invalid piece character '{ch}'"))
            })?;

            if file >= 8 {
                return Err(EngineError::invalid_fen("board rank has too many files"));
            }

            let sq = board_rank * 8 + file;
            position.pieces[color.index()][piece.index()] |= 1u64 << sq;
            file += 1;
        }

        if file != 8 {
            return Err(EngineError::invalid_fen(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> EngineResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(EngineError::invalid_fen(format!(
            "invalid side-to-move field: {side_part}"
        ))),
    }
}

fn parse_castling_rights(castling_part: &str) -> EngineResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => {
                return Err(EngineError::invalid_fen(format!(
                    "invalid castling rights character: {ch}"
                )))
            }
        };
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> EngineResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part).ok_or_else(|| {
        EngineError::invalid_fen(format!("invalid en-passant square: {en_passant_part}"))
    })?;
    Ok(Some(square))
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|piece| (color, piece))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::engine_errors::EngineError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, CASTLE_ALL};

    #[test]
    fn parses_starting_position_fields() {
        let position = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(position.side_to_move, Color::White);
        assert_eq!(position.castling_rights, CASTLE_ALL);
        assert_eq!(position.en_passant_square, None);
        assert_eq!(position.fullmove_number, 1);
        assert_eq!(position.halfmove_clock, 0);
        assert_eq!(position.occupancy_all.count_ones(), 32);
    }

    #[test]
    fn rejects_structurally_broken_fens() {
        let cases = [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1",
            "P3k3/8/8/8/8/8/8/4K3 w - - 0 1",
        ];

        for fen in cases {
            let err = parse_fen(fen).expect_err(fen);
            assert!(matches!(err, EngineError::InvalidFen { .. }), "{fen}: {err}");
        }
    }
}
