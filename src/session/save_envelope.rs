//! Persisted form of a session.
//!
//! ```json
//! {"schemaVersion":1,"startingFen":"...","actions":["b:e2e4","m:d2d4"],
//!  "elapsedDurationsMs":[1200,3400],
//!  "timeControl":{"initialDurationMs":300000,"incrementMs":2000},
//!  "incrementPolicy":"movesOnly"}
//! ```
//!
//! `incrementPolicy` may be absent on input and then defaults to moves only.

use serde::{Deserialize, Serialize};

use crate::clock::time_control::{IncrementPolicy, TimeControl};
use crate::engine_errors::{EngineError, EngineResult};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEnvelope {
    pub schema_version: u32,
    pub starting_fen: String,
    pub actions: Vec<String>,
    pub elapsed_durations_ms: Vec<u64>,
    pub time_control: TimeControl,
    #[serde(default)]
    pub increment_policy: IncrementPolicy,
}

impl SaveEnvelope {
    /// Shape checks that do not need a replay.
    pub fn validate(&self) -> EngineResult<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(corrupt(format!(
                "unsupported schema version {} (expected {SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        if self.actions.len() != self.elapsed_durations_ms.len() {
            return Err(corrupt(format!(
                "{} actions but {} elapsed durations",
                self.actions.len(),
                self.elapsed_durations_ms.len()
            )));
        }
        Ok(())
    }

    pub fn to_json_bytes(&self) -> EngineResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| corrupt(err.to_string()))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> EngineResult<Self> {
        serde_json::from_slice(bytes).map_err(|err| corrupt(err.to_string()))
    }
}

pub(crate) fn corrupt(reason: impl Into<String>) -> EngineError {
    EngineError::CorruptEnvelope {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{SaveEnvelope, SCHEMA_VERSION};
    use crate::clock::time_control::{IncrementPolicy, TimeControl};
    use crate::engine_errors::EngineError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    fn sample() -> SaveEnvelope {
        SaveEnvelope {
            schema_version: SCHEMA_VERSION,
            starting_fen: STARTING_POSITION_FEN.to_owned(),
            actions: vec!["b:e2e4".into(), "m:d2d4".into()],
            elapsed_durations_ms: vec![1_200, 3_400],
            time_control: TimeControl::default(),
            increment_policy: IncrementPolicy::MovesOnly,
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let bytes = sample().to_json_bytes().expect("serialize");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["elapsedDurationsMs"][1], 3_400);
        assert_eq!(value["timeControl"]["incrementMs"], 2_000);
        assert_eq!(value["incrementPolicy"], "movesOnly");
        assert_eq!(SaveEnvelope::from_json_bytes(&bytes), Ok(sample()));
    }

    #[test]
    fn increment_policy_is_optional_on_input() {
        let json = br#"{"schemaVersion":1,"startingFen":"8/8/8/8/8/8/8/8 w - - 0 1",
            "actions":[],"elapsedDurationsMs":[],
            "timeControl":{"initialDurationMs":1000,"incrementMs":0}}"#;
        let envelope = SaveEnvelope::from_json_bytes(json).expect("parse");
        assert_eq!(envelope.increment_policy, IncrementPolicy::MovesOnly);
    }

    #[test]
    fn validation_rejects_bad_shapes() {
        let mut wrong_version = sample();
        wrong_version.schema_version = 2;
        assert!(matches!(
            wrong_version.validate(),
            Err(EngineError::CorruptEnvelope { .. })
        ));

        let mut mismatched = sample();
        mismatched.elapsed_durations_ms.pop();
        assert!(matches!(
            mismatched.validate(),
            Err(EngineError::CorruptEnvelope { .. })
        ));

        assert!(matches!(
            SaveEnvelope::from_json_bytes(b"{\"schemaVersion\":1}"),
            Err(EngineError::CorruptEnvelope { .. })
        ));
        assert_eq!(sample().validate(), Ok(()));
    }
}
