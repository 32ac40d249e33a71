//! Errors used throughout the ban chess core.
//!
//! `EngineError` is the single error type returned by position parsing, the
//! turn engine, the action codec, replay and the session controller.
//!
//! Recovery guidelines:
//! - `InvalidPhase`, `IllegalAction`, `IllegalMove`, `OutOfRangeNavigation`
//!   and `NothingToUndo` are rejected inputs. State is unchanged and the
//!   caller may re-query and retry.
//! - `MalformedNotation` and `InvalidFen` mean the input itself is corrupt.
//! - `CorruptEnvelope` and an exhausted `Desync` must reach the UI as hard
//!   failures that need an explicit reload.

use crate::ban_chess::turn_engine::Phase;
use crate::session::session_controller::SessionState;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid FEN: {reason}")]
    InvalidFen { reason: String },

    #[error("illegal move {notation} in position {fen}")]
    IllegalMove { notation: String, fen: String },

    #[error("a {} action was submitted while the engine is {actual}", .attempted.action_kind())]
    InvalidPhase { attempted: Phase, actual: Phase },

    #[error("action {notation} is not legal here")]
    IllegalAction { notation: String },

    #[error("malformed action notation {input:?}: {reason}")]
    MalformedNotation { input: String, reason: String },

    #[error("replay rejected action #{index}: {source}")]
    ReplayRejected {
        index: usize,
        #[source]
        source: Box<EngineError>,
    },

    #[error("navigation index {index} outside [-1, {last}]")]
    OutOfRangeNavigation { index: isize, last: isize },

    #[error("game {game_id} diverged from the server: {reason}")]
    Desync { game_id: String, reason: String },

    #[error("corrupt save envelope: {reason}")]
    CorruptEnvelope { reason: String },

    #[error("{operation} is not allowed while the session is {state}")]
    InvalidSessionState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("there is no action to undo")]
    NothingToUndo,

    #[error("nested session call from a subscriber was rejected")]
    ReentrantCall,
}

impl EngineError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedNotation {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_fen(reason: impl Into<String>) -> Self {
        EngineError::InvalidFen {
            reason: reason.into(),
        }
    }

    /// True for rejected inputs that leave every piece of state untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidPhase { .. }
                | EngineError::IllegalAction { .. }
                | EngineError::IllegalMove { .. }
                | EngineError::OutOfRangeNavigation { .. }
                | EngineError::NothingToUndo
                | EngineError::ReentrantCall
                | EngineError::InvalidSessionState { .. }
        )
    }
}
