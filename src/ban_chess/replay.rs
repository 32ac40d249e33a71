//! Rebuild a game from its encoded action list.
//!
//! Replay uses nothing but the public turn-engine operations, so a replayed
//! engine and one driven action by action end in identical states. The
//! session relies on this for navigation, undo and load.

use crate::ban_chess::action_codec::Action;
use crate::ban_chess::history::ActionRecord;
use crate::ban_chess::turn_engine::TurnEngine;
use crate::engine_errors::{EngineError, EngineResult};
use crate::game_state::chess_rules::ChessRules;
use crate::game_state::position::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome<P: ChessRules = Position> {
    pub engine: TurnEngine<P>,
    pub records: Vec<ActionRecord>,
}

/// Replay `actions` from `starting_fen`, or from the standard initial
/// position when it is `None`.
///
/// Fails as a whole with `ReplayRejected { index, .. }` naming the first
/// action that could not be decoded or applied.
pub fn replay<S: AsRef<str>>(
    starting_fen: Option<&str>,
    actions: &[S],
) -> EngineResult<ReplayOutcome> {
    let position = match starting_fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::new_game(),
    };
    replay_onto(TurnEngine::new(position), actions)
}

/// Replay `actions` on top of an existing engine.
pub fn replay_onto<P: ChessRules, S: AsRef<str>>(
    mut engine: TurnEngine<P>,
    actions: &[S],
) -> EngineResult<ReplayOutcome<P>> {
    let mut records = Vec::with_capacity(actions.len());

    for (index, text) in actions.iter().enumerate() {
        let record = Action::decode(text.as_ref())
            .and_then(|action| engine.apply_action(action))
            .map_err(|source| EngineError::ReplayRejected {
                index,
                source: Box::new(source),
            })?;
        records.push(record);
    }

    tracing::debug!(actions = actions.len(), ply = engine.ply(), "replay finished");
    Ok(ReplayOutcome { engine, records })
}

#[cfg(test)]
mod tests {
    use super::{replay, replay_onto};
    use crate::ban_chess::action_codec::Action;
    use crate::ban_chess::random_actor::choose_random_action;
    use crate::ban_chess::turn_engine::{Phase, TurnEngine};
    use crate::engine_errors::EngineError;
    use crate::game_state::chess_types::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_game(seed: u64, max_actions: usize) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = TurnEngine::default();
        let mut actions = Vec::new();
        while actions.len() < max_actions {
            let Some(action) = choose_random_action(&engine, &mut rng) else {
                break;
            };
            engine.apply_action(action).expect("random action is legal");
            actions.push(action.encode());
        }
        actions
    }

    #[test]
    fn replays_the_opening_example() {
        let outcome = replay(None, &["b:e2e4", "m:d2d4", "b:e7e5", "m:d7d5"]).expect("legal");
        assert_eq!(
            outcome.engine.to_fen(),
            "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR w KQkq d6 0 2"
        );
        assert_eq!(outcome.engine.phase(), Phase::AwaitingBan);
        assert_eq!(outcome.engine.ban(), None);

        let colors: Vec<Color> = outcome.records.iter().map(|r| r.acting_color).collect();
        assert_eq!(
            colors,
            vec![Color::Black, Color::White, Color::White, Color::Black]
        );
        assert_eq!(outcome.records[2].ply_index, 2);
        assert_eq!(outcome.records[3].notation, "m:d7d5");
    }

    #[test]
    fn rejection_reports_the_offending_index() {
        let err = replay(None, &["b:e2e4", "m:e2e4", "b:e7e5"]).expect_err("banned move");
        assert_eq!(
            err,
            EngineError::ReplayRejected {
                index: 1,
                source: Box::new(EngineError::IllegalAction {
                    notation: "m:e2e4".to_owned()
                }),
            }
        );

        let err = replay(None, &["m:e2e4"]).expect_err("out of phase");
        assert!(matches!(
            err,
            EngineError::ReplayRejected { index: 0, ref source }
                if matches!(**source, EngineError::InvalidPhase { .. })
        ));

        let err = replay(None, &["b:e2e4", "garbage"]).expect_err("malformed");
        assert!(matches!(
            err,
            EngineError::ReplayRejected { index: 1, ref source }
                if matches!(**source, EngineError::MalformedNotation { .. })
        ));
    }

    #[test]
    fn replay_honours_a_custom_start() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 b - - 0 1";
        let outcome = replay(Some(fen), &["b:e8d8", "m:e8f8"]).expect("legal");
        assert_eq!(outcome.engine.to_fen(), "5k2/8/8/8/8/8/4P3/4K3 w - - 1 2");

        assert!(matches!(
            replay(Some("not a fen"), &["b:e2e4"]),
            Err(EngineError::InvalidFen { .. })
        ));
    }

    #[test]
    fn batch_and_incremental_replay_agree() {
        for seed in 0..8 {
            let actions = random_game(seed, 160);
            let batch = replay(None, &actions).expect("batch replay");

            let mut running = TurnEngine::default();
            for text in &actions {
                let action: Action = text.parse().expect("notation");
                running.apply_action(action).expect("incremental replay");
            }
            assert_eq!(batch.engine, running, "seed {seed}");
            assert_eq!(batch.records.len(), actions.len());
        }
    }

    #[test]
    fn replay_is_deterministic_and_splits_cleanly() {
        let actions = random_game(42, 120);
        let first = replay(None, &actions).expect("replay");
        let second = replay(None, &actions).expect("replay");
        assert_eq!(first, second);

        let split = actions.len() / 2;
        let head = replay(None, &actions[..split]).expect("prefix");
        let joined = replay_onto(head.engine, &actions[split..]).expect("suffix");
        assert_eq!(joined.engine, first.engine);
    }

    #[test]
    fn every_move_is_preceded_by_exactly_one_ban() {
        let outcome = replay(None, &random_game(7, 200)).expect("replay");
        for (i, record) in outcome.records.iter().enumerate() {
            let expected = if i % 2 == 0 {
                Phase::AwaitingBan
            } else {
                Phase::AwaitingMove
            };
            assert_eq!(record.phase, expected);
            assert_eq!(record.ply_index as usize, i);
        }
    }
}
