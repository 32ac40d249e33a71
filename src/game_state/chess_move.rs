//! Plain `(from, to, promotion)` move value.
//!
//! Special-move semantics (castling rook hop, en-passant capture, double
//! push) are inferred from the position when the move is applied, so the
//! value stays identical to what a UI or the action codec describes.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// The `(from, to)` pair a ban refers to.
    #[inline]
    pub const fn squares(&self) -> (Square, Square) {
        (self.from, self.to)
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            square_to_algebraic(self.from),
            square_to_algebraic(self.to)
        )?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ChessMove;
    use crate::game_state::chess_types::PieceKind;

    #[test]
    fn displays_long_algebraic_with_promotion_suffix() {
        assert_eq!(ChessMove::new(12, 28).to_string(), "e2e4");
        assert_eq!(
            ChessMove::with_promotion(52, 60, PieceKind::Queen).to_string(),
            "e7e8q"
        );
    }
}
