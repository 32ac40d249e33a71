//! Time control parameters shared by reconstruction and sessions.

use serde::{Deserialize, Serialize};

/// Starting time per side and the per-action bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeControl {
    pub initial_duration_ms: u64,
    pub increment_ms: u64,
}

impl TimeControl {
    pub const fn new(initial_duration_ms: u64, increment_ms: u64) -> Self {
        Self {
            initial_duration_ms,
            increment_ms,
        }
    }
}

impl Default for TimeControl {
    /// Five minutes plus two seconds.
    fn default() -> Self {
        Self::new(300_000, 2_000)
    }
}

/// Which accepted actions earn the increment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncrementPolicy {
    /// Only chess moves add time; bans only spend it.
    #[default]
    MovesOnly,
    /// Bans and moves both add time.
    EveryAction,
}

impl IncrementPolicy {
    #[inline]
    pub const fn rewards(self, is_ban: bool) -> bool {
        match self {
            IncrementPolicy::MovesOnly => !is_ban,
            IncrementPolicy::EveryAction => true,
        }
    }
}
