//! Uniformly random legal actor, for playouts and smoke testing.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::ban_chess::action_codec::Action;
use crate::ban_chess::turn_engine::{Phase, TurnEngine};
use crate::game_state::chess_rules::ChessRules;

/// Pick a legal ban or move (by phase) at random. `None` once the game is
/// over.
pub fn choose_random_action<P, R>(engine: &TurnEngine<P>, rng: &mut R) -> Option<Action>
where
    P: ChessRules,
    R: Rng + ?Sized,
{
    if engine.is_over() {
        return None;
    }

    match engine.phase() {
        Phase::AwaitingBan => engine
            .legal_bans()
            .ok()?
            .as_slice()
            .choose(rng)
            .copied()
            .map(Action::Ban),
        Phase::AwaitingMove => engine
            .legal_moves()
            .ok()?
            .as_slice()
            .choose(rng)
            .copied()
            .map(Action::Move),
    }
}
