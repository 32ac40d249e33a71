//! Two-phase ban/move state machine layered on standard chess rules.
//!
//! Every move is preceded by a ban: the side that is *not* about to move
//! names one `(from, to)` pair, and the side to move must then play any
//! other legal move. The engine holds the position behind [`ChessRules`] and
//! never looks inside it, so the sequencing rules here are independent of
//! how legality is computed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ban_chess::action_codec::{Action, Ban};
use crate::ban_chess::history::ActionRecord;
use crate::engine_errors::{EngineError, EngineResult};
use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_rules::ChessRules;
use crate::game_state::chess_types::Color;
use crate::game_state::position::Position;
use crate::utils::algebraic::square_to_algebraic;

/// What the engine expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    AwaitingBan,
    AwaitingMove,
}

impl Phase {
    pub const fn action_kind(self) -> &'static str {
        match self {
            Phase::AwaitingBan => "ban",
            Phase::AwaitingMove => "move",
        }
    }

    pub const fn next(self) -> Phase {
        match self {
            Phase::AwaitingBan => Phase::AwaitingMove,
            Phase::AwaitingMove => Phase::AwaitingBan,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "awaiting a {}", self.action_kind())
    }
}

/// Why a game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalReason {
    Checkmate,
    Stalemate,
    /// The ban removed the last legal move of the side to move.
    BannedIntoNoMoves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub reason: TerminalReason,
    /// `None` for a draw.
    pub winner: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnEngine<P: ChessRules = Position> {
    position: P,
    phase: Phase,
    ban: Option<Ban>,
    ply: u32,
    outcome: Option<GameOutcome>,
}

impl Default for TurnEngine<Position> {
    fn default() -> Self {
        Self::new(Position::new_game())
    }
}

impl<P: ChessRules> TurnEngine<P> {
    /// Fresh engine on `position`, waiting for the non-moving side's ban.
    pub fn new(position: P) -> Self {
        let mut engine = Self {
            position,
            phase: Phase::AwaitingBan,
            ban: None,
            ply: 0,
            outcome: None,
        };
        engine.outcome = engine.outcome_after_move();
        engine
    }

    /// Resume a game in the middle of a ban/move unit.
    ///
    /// A ban is only accepted together with `AwaitingMove`, and it must name
    /// a move the side to move could legally play.
    pub fn from_snapshot(position: P, phase: Phase, ban: Option<Ban>, ply: u32) -> EngineResult<Self> {
        let mut engine = Self {
            position,
            phase,
            ban: None,
            ply,
            outcome: None,
        };

        match (phase, ban) {
            (Phase::AwaitingBan, Some(ban)) => {
                return Err(EngineError::IllegalAction {
                    notation: Action::Ban(ban).to_string(),
                });
            }
            (Phase::AwaitingBan, None) => engine.outcome = engine.outcome_after_move(),
            (Phase::AwaitingMove, Some(ban)) => {
                if !engine.unrestricted_bans().contains(&ban) {
                    return Err(EngineError::IllegalAction {
                        notation: Action::Ban(ban).to_string(),
                    });
                }
                engine.ban = Some(ban);
                engine.outcome = engine.outcome_after_ban();
            }
            (Phase::AwaitingMove, None) => engine.outcome = engine.outcome_after_move(),
        }

        Ok(engine)
    }

    #[inline]
    pub fn position(&self) -> &P {
        &self.position
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Active ban; only ever set while awaiting a move.
    #[inline]
    pub fn ban(&self) -> Option<Ban> {
        self.ban
    }

    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// The side whose chess move comes next.
    #[inline]
    pub fn next_mover(&self) -> Color {
        self.position.side_to_move()
    }

    /// The side that must submit the next action: the banner during the ban
    /// phase, the mover during the move phase.
    pub fn acting_color(&self) -> Color {
        match self.phase {
            Phase::AwaitingBan => self.next_mover().opposite(),
            Phase::AwaitingMove => self.next_mover(),
        }
    }

    #[inline]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[inline]
    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        self.outcome.map(|outcome| outcome.reason)
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Every `(from, to)` pair the side to move could legally play.
    pub fn legal_bans(&self) -> EngineResult<Vec<Ban>> {
        self.expect_phase(Phase::AwaitingBan)?;
        Ok(self.unrestricted_bans())
    }

    pub fn issue_ban(&mut self, ban: Ban) -> EngineResult<()> {
        self.expect_phase(Phase::AwaitingBan)?;
        if !self.unrestricted_bans().contains(&ban) {
            return Err(EngineError::IllegalAction {
                notation: Action::Ban(ban).to_string(),
            });
        }

        self.ban = Some(ban);
        self.phase = self.phase.next();
        self.ply += 1;
        self.outcome = self.outcome_after_ban();
        tracing::trace!(%ban, ply = self.ply, "ban issued");
        Ok(())
    }

    /// Legal moves of the side to move minus the banned pair. Promotion
    /// variants of the banned pair are all excluded; other moves from the
    /// same square stay available.
    pub fn legal_moves(&self) -> EngineResult<Vec<ChessMove>> {
        self.expect_phase(Phase::AwaitingMove)?;
        Ok(self.restricted_moves())
    }

    pub fn apply_move(&mut self, mv: ChessMove) -> EngineResult<()> {
        self.expect_phase(Phase::AwaitingMove)?;
        if !self.restricted_moves().contains(&mv) {
            return Err(EngineError::IllegalAction {
                notation: Action::Move(mv).to_string(),
            });
        }

        self.position = self.position.apply(mv)?;
        self.ban = None;
        self.phase = self.phase.next();
        self.ply += 1;
        self.outcome = self.outcome_after_move();
        tracing::trace!(%mv, ply = self.ply, "move applied");
        Ok(())
    }

    /// Route `action` to `issue_ban` or `apply_move` and describe what was
    /// accepted.
    pub fn apply_action(&mut self, action: Action) -> EngineResult<ActionRecord> {
        let record = ActionRecord {
            ply_index: self.ply,
            acting_color: self.acting_color(),
            phase: self.phase,
            action,
            notation: action.to_string(),
        };

        match action {
            Action::Ban(ban) => self.issue_ban(ban)?,
            Action::Move(mv) => self.apply_move(mv)?,
        }

        Ok(record)
    }

    /// Legal bans or moves (by phase) grouped by origin square, for board
    /// adapters. Empty when `color` is not the side that acts next.
    pub fn destinations_for(&self, color: Color) -> BTreeMap<String, Vec<String>> {
        let mut destinations: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if color != self.acting_color() {
            return destinations;
        }

        let pairs: Vec<Ban> = match self.phase {
            Phase::AwaitingBan => self.unrestricted_bans(),
            Phase::AwaitingMove => dedup_pairs(self.restricted_moves()),
        };

        for pair in pairs {
            destinations
                .entry(square_to_algebraic(pair.from))
                .or_default()
                .push(square_to_algebraic(pair.to));
        }
        destinations
    }

    fn expect_phase(&self, wanted: Phase) -> EngineResult<()> {
        if self.phase == wanted {
            Ok(())
        } else {
            Err(EngineError::InvalidPhase {
                attempted: wanted,
                actual: self.phase,
            })
        }
    }

    fn unrestricted_bans(&self) -> Vec<Ban> {
        dedup_pairs(self.position.legal_moves(self.next_mover()))
    }

    fn restricted_moves(&self) -> Vec<ChessMove> {
        let mut moves = self.position.legal_moves(self.next_mover());
        if let Some(ban) = self.ban {
            moves.retain(|mv| !ban.matches(mv));
        }
        moves
    }

    /// Checkmate or stalemate for the side that has to move next.
    fn outcome_after_move(&self) -> Option<GameOutcome> {
        let mover = self.next_mover();
        if !self.position.legal_moves(mover).is_empty() {
            return None;
        }

        Some(if self.position.in_check(mover) {
            GameOutcome {
                reason: TerminalReason::Checkmate,
                winner: Some(mover.opposite()),
            }
        } else {
            GameOutcome {
                reason: TerminalReason::Stalemate,
                winner: None,
            }
        })
    }

    fn outcome_after_ban(&self) -> Option<GameOutcome> {
        if !self.restricted_moves().is_empty() {
            return None;
        }

        Some(GameOutcome {
            reason: TerminalReason::BannedIntoNoMoves,
            winner: Some(self.next_mover().opposite()),
        })
    }
}

/// Distinct `(from, to)` pairs, sorted.
fn dedup_pairs(moves: Vec<ChessMove>) -> Vec<Ban> {
    let mut pairs: Vec<Ban> = moves
        .into_iter()
        .map(|mv| Ban::new(mv.from, mv.to))
        .collect();
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}
