//! Rule constants and the narrow rules interface consumed by the ban layer.
//!
//! The turn engine only ever talks to a position through [`ChessRules`], so
//! ban sequencing can be exercised against a scripted stand-in as well as the
//! real bitboard [`Position`](crate::game_state::position::Position).

use crate::engine_errors::EngineResult;
use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_types::Color;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Standard chess rules as seen from the ban/move state machine.
pub trait ChessRules: Clone {
    fn side_to_move(&self) -> Color;

    /// Fully legal moves for `color`; empty when `color` is not to move.
    fn legal_moves(&self, color: Color) -> Vec<ChessMove>;

    /// Returns the successor position or `IllegalMove`.
    fn apply(&self, mv: ChessMove) -> EngineResult<Self>;

    fn in_check(&self, color: Color) -> bool;

    fn to_fen(&self) -> String;
}
