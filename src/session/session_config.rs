//! Per-session settings, passed explicitly to `initialize`.

use serde::{Deserialize, Serialize};

use crate::clock::time_control::{IncrementPolicy, TimeControl};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    /// Both sides play on this controller.
    #[default]
    Local,
    /// A server confirms every action; the controller is a verifying cache.
    Networked,
}

/// Configuration for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Identifier used in logs and matched against incoming remote messages.
    /// Default: "local", a placeholder shared by every local session that
    /// was not given its own id with `with_game_id`.
    pub game_id: String,
    /// FEN to start from. `None` means the standard initial position.
    pub starting_fen: Option<String>,
    /// Default: 5 minutes + 2 seconds.
    pub time_control: TimeControl,
    /// Default: moves only.
    pub increment_policy: IncrementPolicy,
    /// Default: local.
    pub mode: SessionMode,
    /// Full reloads attempted after a rejected remote action before giving
    /// up with a desync error. 0 = fail immediately. Default: 3.
    pub max_resync_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_id: "local".to_owned(),
            starting_fen: None,
            time_control: TimeControl::default(),
            increment_policy: IncrementPolicy::default(),
            mode: SessionMode::default(),
            max_resync_attempts: 3,
        }
    }
}

impl SessionConfig {
    /// Networked session for `game_id` with default clocks.
    pub fn networked(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            mode: SessionMode::Networked,
            ..Self::default()
        }
    }

    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = game_id.into();
        self
    }

    pub fn with_starting_fen(mut self, fen: impl Into<String>) -> Self {
        self.starting_fen = Some(fen.into());
        self
    }

    pub fn with_time_control(mut self, time_control: TimeControl) -> Self {
        self.time_control = time_control;
        self
    }

    pub fn with_increment_policy(mut self, policy: IncrementPolicy) -> Self {
        self.increment_policy = policy;
        self
    }

    pub fn with_max_resync_attempts(mut self, attempts: u32) -> Self {
        self.max_resync_attempts = attempts;
        self
    }
}
