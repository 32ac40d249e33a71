//! Networked play: applying server-confirmed actions and recovering from
//! divergence.
//!
//! Actions the client played itself are applied at once and stay pending
//! until the server echoes them back in order. Any other remote action goes
//! through the same path as a local one. When an echo does not match, or a
//! remote action does not apply, local state is thrown away and rebuilt from
//! the server's full history; there is no partial repair.

use serde::{Deserialize, Serialize};

use crate::engine_errors::{EngineError, EngineResult};
use crate::session::save_envelope::SaveEnvelope;
use crate::session::session_config::SessionMode;
use crate::session::session_controller::{SessionController, SessionState};

/// One authoritative action as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteActionMessage {
    pub game_id: String,
    pub action: String,
    pub server_elapsed_ms: u64,
}

/// Source of the server's complete game record.
pub trait AuthoritativeHistory {
    fn fetch_history(&mut self, game_id: &str) -> EngineResult<SaveEnvelope>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteApplied {
    /// Applied on top of local state.
    Applied,
    /// Echo of the oldest pending local action.
    Confirmed,
    /// Local state was replaced by the server's history.
    Resynced { attempts: u32 },
}

impl SessionController {
    pub fn receive_remote_action(
        &mut self,
        message: &RemoteActionMessage,
        authority: &mut dyn AuthoritativeHistory,
    ) -> EngineResult<RemoteApplied> {
        if self.state() == SessionState::Idle || self.config().mode == SessionMode::Local {
            return Err(EngineError::InvalidSessionState {
                operation: "receive_remote_action",
                state: self.state(),
            });
        }
        if message.game_id != self.id() {
            return Err(EngineError::Desync {
                game_id: message.game_id.clone(),
                reason: format!("message addressed to a different game than {}", self.id()),
            });
        }

        let pending = self.unconfirmed_actions().first().map(|e| e.notation().to_owned());
        let rejection = match pending {
            Some(expected) if expected == message.action => {
                self.confirm_oldest(message.server_elapsed_ms);
                return Ok(RemoteApplied::Confirmed);
            }
            Some(expected) => EngineError::Desync {
                game_id: message.game_id.clone(),
                reason: format!("server played {} where {expected} was pending", message.action),
            },
            None => match self.apply_remote(&message.action, message.server_elapsed_ms) {
                Ok(()) => return Ok(RemoteApplied::Applied),
                Err(err) => err,
            },
        };
        tracing::warn!(
            game_id = %message.game_id,
            action = %message.action,
            error = %rejection,
            "remote action rejected, resyncing"
        );

        let max_attempts = self.config().max_resync_attempts;
        let mut last_error = rejection;
        for attempt in 1..=max_attempts {
            match authority
                .fetch_history(&message.game_id)
                .and_then(|envelope| self.load(envelope))
            {
                Ok(()) => {
                    tracing::warn!(game_id = %message.game_id, attempt, "resynced from server history");
                    return Ok(RemoteApplied::Resynced { attempts: attempt });
                }
                Err(err) => {
                    tracing::warn!(game_id = %message.game_id, attempt, error = %err, "resync attempt failed");
                    last_error = err;
                }
            }
        }

        Err(EngineError::Desync {
            game_id: message.game_id.clone(),
            reason: format!("gave up after {max_attempts} resync attempts: {last_error}"),
        })
    }
}
