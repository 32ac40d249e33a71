//! Records of accepted actions.

use crate::ban_chess::action_codec::Action;
use crate::ban_chess::turn_engine::Phase;
use crate::game_state::chess_types::Color;

/// One accepted action, without timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Ply the engine was at when the action arrived.
    pub ply_index: u32,
    pub acting_color: Color,
    pub phase: Phase,
    pub action: Action,
    /// Canonical encoding of `action`.
    pub notation: String,
}

/// An entry in a session's canonical history. Never edited after append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub record: ActionRecord,
    /// Wall time the acting side spent on this action.
    pub elapsed_ms: u64,
}

impl HistoryEntry {
    pub fn new(record: ActionRecord, elapsed_ms: u64) -> Self {
        Self { record, elapsed_ms }
    }

    #[inline]
    pub fn notation(&self) -> &str {
        &self.record.notation
    }

    #[inline]
    pub fn acting_color(&self) -> Color {
        self.record.acting_color
    }

    #[inline]
    pub fn is_ban(&self) -> bool {
        matches!(self.record.action, Action::Ban(_))
    }
}
