//! Standard chess position.
//!
//! `Position` stores one bitboard per (color, piece kind) plus occupancy
//! caches, side to move, castling rights, en-passant target and the two FEN
//! counters. It is a value type: `apply` returns the successor and leaves
//! `self` untouched. Nothing in here knows about bans.

use std::fmt;

use crate::engine_errors::{EngineError, EngineResult};
use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_rules::ChessRules;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::apply_unchecked;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::render_position::render_position;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    // [color][piece_kind]
    pub pieces: [[Bitboard; 6]; 2],

    pub occupancy_by_color: [Bitboard; 2],
    pub occupancy_all: Bitboard,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Default for Position {
    /// The standard starting position.
    fn default() -> Self {
        let mut position = Self::new_empty();
        let white = Color::White.index();
        let black = Color::Black.index();

        position.pieces[white] = [
            0x0000_0000_0000_FF00,
            (1 << 1) | (1 << 6),
            (1 << 2) | (1 << 5),
            (1 << 0) | (1 << 7),
            1 << 3,
            1 << 4,
        ];
        for kind in PieceKind::ALL {
            // Black mirrors white across the middle of the board.
            position.pieces[black][kind.index()] = position.pieces[white][kind.index()].swap_bytes();
        }

        position.castling_rights = CASTLE_ALL;
        position.recalc_occupancy();
        position
    }
}

impl Position {
    /// Board with no pieces, white to move and no rights.
    pub fn new_empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn new_game() -> Self {
        Self::default()
    }

    #[inline]
    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = square_bit(square);
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some((color, kind));
                }
            }
        }
        None
    }

    /// Legal moves for `color`. A color that is not to move has none.
    pub fn legal_moves(&self, color: Color) -> Vec<ChessMove> {
        if color != self.side_to_move {
            return Vec::new();
        }
        generate_legal_moves(self)
    }

    /// Play a legal move for the side to move.
    pub fn apply(&self, mv: ChessMove) -> EngineResult<Position> {
        if !self.legal_moves(self.side_to_move).contains(&mv) {
            return Err(EngineError::IllegalMove {
                notation: mv.to_string(),
                fen: self.to_fen(),
            });
        }
        Ok(apply_unchecked(self, mv))
    }

    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        is_king_in_check(self, color)
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check(self.side_to_move) && generate_legal_moves(self).is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check(self.side_to_move) && generate_legal_moves(self).is_empty()
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in Color::BOTH {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }
}

impl ChessRules for Position {
    fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    fn legal_moves(&self, color: Color) -> Vec<ChessMove> {
        Position::legal_moves(self, color)
    }

    fn apply(&self, mv: ChessMove) -> EngineResult<Self> {
        Position::apply(self, mv)
    }

    fn in_check(&self, color: Color) -> bool {
        Position::in_check(self, color)
    }

    fn to_fen(&self) -> String {
        Position::to_fen(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_position(self))
    }
}
