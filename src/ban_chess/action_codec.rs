//! Text form of a single ban or move action.
//!
//! `b:<from><to>` names a banned square pair, `m:<from><to>[q|r|b|n]` a move.
//! Squares are lowercase algebraic coordinates. Encoding is canonical: the
//! string produced by `encode` is the only spelling `decode` accepts for a
//! given action.

use std::fmt;
use std::str::FromStr;

use crate::ban_chess::turn_engine::Phase;
use crate::engine_errors::{EngineError, EngineResult};
use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

const BAN_PREFIX: &str = "b:";
const MOVE_PREFIX: &str = "m:";

/// A forbidden `(from, to)` pair. Covers every promotion choice on that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ban {
    pub from: Square,
    pub to: Square,
}

impl Ban {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn matches(&self, mv: &ChessMove) -> bool {
        mv.squares() == (self.from, self.to)
    }
}

impl fmt::Display for Ban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            square_to_algebraic(self.from),
            square_to_algebraic(self.to)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ban(Ban),
    Move(ChessMove),
}

impl Action {
    /// The phase in which this action is accepted.
    pub const fn phase(&self) -> Phase {
        match self {
            Action::Ban(_) => Phase::AwaitingBan,
            Action::Move(_) => Phase::AwaitingMove,
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(input: &str) -> EngineResult<Action> {
        if let Some(body) = input.strip_prefix(BAN_PREFIX) {
            if body.len() != 4 {
                return Err(EngineError::malformed(input, "a ban is exactly two squares"));
            }
            let (from, to) = parse_square_pair(input, body)?;
            return Ok(Action::Ban(Ban::new(from, to)));
        }

        if let Some(body) = input.strip_prefix(MOVE_PREFIX) {
            let (squares, promotion) = match body.len() {
                4 => (body, None),
                5 if body.is_char_boundary(4) => {
                    let (squares, letter) = body.split_at(4);
                    (squares, Some(parse_promotion(input, letter)?))
                }
                _ => {
                    return Err(EngineError::malformed(
                        input,
                        "a move is two squares and an optional promotion",
                    ))
                }
            };
            let (from, to) = parse_square_pair(input, squares)?;
            return Ok(Action::Move(ChessMove { from, to, promotion }));
        }

        Err(EngineError::malformed(input, "expected a `b:` or `m:` prefix"))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Ban(ban) => write!(f, "{BAN_PREFIX}{ban}"),
            Action::Move(mv) => write!(f, "{MOVE_PREFIX}{mv}"),
        }
    }
}

impl FromStr for Action {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::decode(s)
    }
}

impl From<Ban> for Action {
    fn from(ban: Ban) -> Self {
        Action::Ban(ban)
    }
}

impl From<ChessMove> for Action {
    fn from(mv: ChessMove) -> Self {
        Action::Move(mv)
    }
}

fn parse_square_pair(input: &str, squares: &str) -> EngineResult<(Square, Square)> {
    if !squares.is_char_boundary(2) {
        return Err(EngineError::malformed(input, "squares must be ASCII"));
    }
    let (from, to) = squares.split_at(2);
    let from = algebraic_to_square(from)
        .ok_or_else(|| EngineError::malformed(input, format!("`{from}` is not a square")))?;
    let to = algebraic_to_square(to)
        .ok_or_else(|| EngineError::malformed(input, format!("`{to}` is not a square")))?;
    Ok((from, to))
}

fn parse_promotion(input: &str, letter: &str) -> EngineResult<PieceKind> {
    let mut chars = letter.chars();
    let kind = chars
        .next()
        .filter(|c| c.is_ascii_lowercase())
        .and_then(PieceKind::from_letter)
        .filter(|kind| PieceKind::PROMOTIONS.contains(kind));
    kind.ok_or_else(|| EngineError::malformed(input, "promotion must be one of q, r, b, n"))
}
