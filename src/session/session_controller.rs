//! Owner of one game's canonical history.
//!
//! The controller is the only mutable piece of the core. Every mutating call
//! validates against the canonical turn engine first, changes state only on
//! success, then builds a complete [`SessionSnapshot`] and hands it to each
//! subscriber in registration order.
//!
//! Navigation never touches canonical history: it replays a prefix into a
//! transient engine, renders that, and keeps the rendered snapshot until the
//! cursor moves again or an action returns the session to live play.

use std::collections::BTreeMap;
use std::fmt;

use crate::ban_chess::action_codec::{Action, Ban};
use crate::ban_chess::history::HistoryEntry;
use crate::ban_chess::replay::replay;
use crate::ban_chess::turn_engine::{GameOutcome, Phase, TerminalReason, TurnEngine};
use crate::clock::clock_reconstruction::{clocks_at_ply, live_clock_seed, ClockSnapshot};
use crate::clock::elapsed_source::{ElapsedSource, SystemClock};
use crate::engine_errors::{EngineError, EngineResult};
use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::position::Position;
use crate::session::save_envelope::{corrupt, SaveEnvelope, SCHEMA_VERSION};
use crate::session::session_config::{SessionConfig, SessionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Live,
    ViewingHistory,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Idle => "idle",
            SessionState::Live => "live",
            SessionState::ViewingHistory => "viewing history",
        })
    }
}

/// Immutable view handed to subscribers and UI code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Navigation index when viewing history.
    pub cursor: Option<isize>,
    pub history_len: usize,
    pub fen: String,
    pub phase: Phase,
    pub ban: Option<Ban>,
    pub acting_color: Color,
    /// Filled during the ban phase.
    pub legal_bans: Vec<Ban>,
    /// Filled during the move phase.
    pub legal_moves: Vec<ChessMove>,
    pub clocks: ClockSnapshot,
    pub outcome: Option<GameOutcome>,
}

impl SessionSnapshot {
    fn render(
        engine: &TurnEngine,
        clocks: ClockSnapshot,
        state: SessionState,
        cursor: Option<isize>,
        history_len: usize,
    ) -> Self {
        Self {
            state,
            cursor,
            history_len,
            fen: engine.to_fen(),
            phase: engine.phase(),
            ban: engine.ban(),
            acting_color: engine.acting_color(),
            legal_bans: engine.legal_bans().unwrap_or_default(),
            legal_moves: engine.legal_moves().unwrap_or_default(),
            clocks,
            outcome: engine.outcome(),
        }
    }
}

/// Handle returned by [`SessionController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

type Subscriber = Box<dyn FnMut(&SessionSnapshot)>;

pub struct SessionController {
    config: SessionConfig,
    state: SessionState,
    starting_fen: String,
    engine: TurnEngine,
    history: Vec<HistoryEntry>,
    /// Rendered navigation view; `Some` exactly while viewing history.
    view: Option<SessionSnapshot>,
    elapsed: Box<dyn ElapsedSource>,
    subscribers: Vec<(SubscriptionToken, Subscriber)>,
    next_token: u64,
    /// Trailing history entries applied locally in networked mode that the
    /// server has not echoed back yet.
    unconfirmed: usize,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("game_id", &self.config.game_id)
            .field("state", &self.state)
            .field("fen", &self.engine.to_fen())
            .field("history_len", &self.history.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// Idle controller timing actions with the system clock.
    pub fn new() -> Self {
        Self::with_elapsed_source(Box::new(SystemClock::new()))
    }

    pub fn with_elapsed_source(elapsed: Box<dyn ElapsedSource>) -> Self {
        Self {
            config: SessionConfig::default(),
            state: SessionState::Idle,
            starting_fen: STARTING_POSITION_FEN.to_owned(),
            engine: TurnEngine::default(),
            history: Vec::new(),
            view: None,
            elapsed,
            subscribers: Vec::new(),
            next_token: 0,
            unconfirmed: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.config.game_id
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Canonical engine, regardless of navigation.
    #[inline]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    pub fn initialize(&mut self, config: SessionConfig) -> EngineResult<()> {
        let position = match config.starting_fen.as_deref() {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::new_game(),
        };

        self.starting_fen = position.to_fen();
        self.engine = TurnEngine::new(position);
        self.history.clear();
        self.unconfirmed = 0;
        self.view = None;
        self.config = config;
        self.state = SessionState::Live;
        self.elapsed.restart();

        tracing::info!(
            game_id = %self.config.game_id,
            mode = ?self.config.mode,
            fen = %self.starting_fen,
            "session initialized"
        );
        self.notify();
        Ok(())
    }

    /// Apply an encoded action to the canonical game, timing it with the
    /// session's elapsed source.
    ///
    /// In networked mode the action stays unconfirmed until the server echoes
    /// it back through `receive_remote_action`.
    pub fn perform_action(&mut self, notation: &str) -> EngineResult<()> {
        self.commit(notation, None)?;
        self.track_local_action();
        Ok(())
    }

    /// Like `perform_action`, with an externally measured duration.
    pub fn perform_timed_action(&mut self, notation: &str, elapsed_ms: u64) -> EngineResult<()> {
        self.commit(notation, Some(elapsed_ms))?;
        self.track_local_action();
        Ok(())
    }

    /// Locally applied actions still waiting for the server, oldest first.
    pub fn unconfirmed_actions(&self) -> &[HistoryEntry] {
        &self.history[self.history.len() - self.unconfirmed..]
    }

    /// Mark the oldest unconfirmed action as confirmed, taking the server's
    /// timing for it.
    pub(crate) fn confirm_oldest(&mut self, server_elapsed_ms: u64) {
        if self.unconfirmed == 0 {
            return;
        }
        let index = self.history.len() - self.unconfirmed;
        self.history[index].elapsed_ms = server_elapsed_ms;
        self.unconfirmed -= 1;

        let cursor = self.view.as_ref().map(|view| view.cursor);
        if let Some(cursor) = cursor {
            let clocks = self.clocks_through(cursor.and_then(|c| usize::try_from(c).ok()));
            if let Some(view) = self.view.as_mut() {
                view.clocks = clocks;
            }
        }

        tracing::debug!(
            game_id = %self.config.game_id,
            ply = index,
            server_elapsed_ms,
            pending = self.unconfirmed,
            "local action confirmed"
        );
        self.notify();
    }

    /// Server-originated action; never counted as unconfirmed.
    pub(crate) fn apply_remote(&mut self, notation: &str, server_elapsed_ms: u64) -> EngineResult<()> {
        self.commit(notation, Some(server_elapsed_ms))
    }

    fn track_local_action(&mut self) {
        if self.config.mode == SessionMode::Networked {
            self.unconfirmed += 1;
        }
    }

    fn commit(&mut self, notation: &str, elapsed_ms: Option<u64>) -> EngineResult<()> {
        self.require("perform_action", &[SessionState::Live, SessionState::ViewingHistory])?;

        let action = Action::decode(notation)?;
        let record = self.engine.apply_action(action)?;
        let elapsed_ms = match elapsed_ms {
            Some(ms) => {
                self.elapsed.restart();
                ms
            }
            None => self.elapsed.lap_ms(),
        };

        tracing::debug!(
            game_id = %self.config.game_id,
            ply = record.ply_index,
            action = %record.notation,
            color = %record.acting_color,
            elapsed_ms,
            "action accepted"
        );
        self.history.push(HistoryEntry::new(record, elapsed_ms));
        self.return_to_live();
        self.notify();
        Ok(())
    }

    /// Drop the last action and rebuild the engine from the remaining prefix.
    pub fn undo(&mut self) -> EngineResult<()> {
        self.require("undo", &[SessionState::Live])?;
        if self.history.is_empty() {
            return Err(EngineError::NothingToUndo);
        }

        let keep = self.history.len() - 1;
        let prefix: Vec<&str> = self.history[..keep].iter().map(HistoryEntry::notation).collect();
        let rebuilt = replay(Some(self.starting_fen.as_str()), &prefix)?;

        self.engine = rebuilt.engine;
        self.history.truncate(keep);
        self.unconfirmed = self.unconfirmed.saturating_sub(1);
        self.view = None;
        self.elapsed.restart();

        tracing::debug!(game_id = %self.config.game_id, history_len = keep, "undo");
        self.notify();
        Ok(())
    }

    /// Show the position after canonical action `ply_index` (`-1` is the
    /// starting position). Choosing the last index returns to live play.
    pub fn navigate_to(&mut self, ply_index: isize) -> EngineResult<()> {
        self.require("navigate_to", &[SessionState::Live, SessionState::ViewingHistory])?;

        let last = self.history.len() as isize - 1;
        if !(-1..=last).contains(&ply_index) {
            return Err(EngineError::OutOfRangeNavigation {
                index: ply_index,
                last,
            });
        }

        if ply_index == last {
            self.return_to_live();
            tracing::debug!(game_id = %self.config.game_id, ply_index, "navigated to live");
            self.notify();
            return Ok(());
        }

        let count = (ply_index + 1) as usize;
        let prefix: Vec<&str> = self.history[..count].iter().map(HistoryEntry::notation).collect();
        let transient = replay(Some(self.starting_fen.as_str()), &prefix)?;
        let clocks = self.clocks_through(count.checked_sub(1));

        self.view = Some(SessionSnapshot::render(
            &transient.engine,
            clocks,
            SessionState::ViewingHistory,
            Some(ply_index),
            self.history.len(),
        ));
        self.state = SessionState::ViewingHistory;

        tracing::debug!(game_id = %self.config.game_id, ply_index, "navigated into history");
        self.notify();
        Ok(())
    }

    pub fn save(&self) -> EngineResult<SaveEnvelope> {
        self.require("save", &[SessionState::Live, SessionState::ViewingHistory])?;

        Ok(SaveEnvelope {
            schema_version: SCHEMA_VERSION,
            starting_fen: self.starting_fen.clone(),
            actions: self.history.iter().map(|e| e.notation().to_owned()).collect(),
            elapsed_durations_ms: self.history.iter().map(|e| e.elapsed_ms).collect(),
            time_control: self.config.time_control,
            increment_policy: self.config.increment_policy,
        })
    }

    pub fn save_bytes(&self) -> EngineResult<Vec<u8>> {
        self.save()?.to_json_bytes()
    }

    /// Replace the session with `envelope`. Nothing changes unless the whole
    /// envelope validates and replays.
    pub fn load(&mut self, envelope: SaveEnvelope) -> EngineResult<()> {
        envelope.validate()?;

        let replayed = replay(Some(envelope.starting_fen.as_str()), &envelope.actions)
            .map_err(|err| corrupt(err.to_string()))?;
        let history: Vec<HistoryEntry> = replayed
            .records
            .into_iter()
            .zip(envelope.elapsed_durations_ms.iter().copied())
            .map(|(record, elapsed_ms)| HistoryEntry::new(record, elapsed_ms))
            .collect();

        self.starting_fen = envelope.starting_fen;
        self.engine = replayed.engine;
        self.history = history;
        self.unconfirmed = 0;
        self.view = None;
        self.config.starting_fen = Some(self.starting_fen.clone());
        self.config.time_control = envelope.time_control;
        self.config.increment_policy = envelope.increment_policy;
        self.state = SessionState::Live;
        self.elapsed.restart();

        tracing::info!(
            game_id = %self.config.game_id,
            actions = self.history.len(),
            "session loaded"
        );
        self.notify();
        Ok(())
    }

    pub fn load_bytes(&mut self, bytes: &[u8]) -> EngineResult<()> {
        self.load(SaveEnvelope::from_json_bytes(bytes)?)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut(&SessionSnapshot) + 'static,
    {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.subscribers.push((token, Box::new(callback)));
        token
    }

    /// False if the token was not registered.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(registered, _)| *registered != token);
        self.subscribers.len() != before
    }

    /// What the UI should show right now: the navigation view while viewing
    /// history, the canonical game otherwise.
    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.view {
            Some(view) => view.clone(),
            None => self.live_snapshot(),
        }
    }

    pub fn current_terminal_reason(&self) -> Option<TerminalReason> {
        self.engine.terminal_reason()
    }

    /// Origin square to destination squares for the canonical game.
    pub fn compute_destinations_for_ui(&self, color: Color) -> BTreeMap<String, Vec<String>> {
        if self.state == SessionState::Idle {
            return BTreeMap::new();
        }
        self.engine.destinations_for(color)
    }

    /// Starting value for the host's countdown of the side acting next.
    pub fn live_clock_seed(&self) -> u64 {
        live_clock_seed(
            &self.history,
            self.config.time_control,
            self.config.increment_policy,
            self.engine.acting_color(),
        )
    }

    fn live_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::render(
            &self.engine,
            self.clocks_through(self.history.len().checked_sub(1)),
            self.state,
            None,
            self.history.len(),
        )
    }

    fn clocks_through(&self, upto_index: Option<usize>) -> ClockSnapshot {
        clocks_at_ply(
            &self.history,
            self.config.time_control,
            self.config.increment_policy,
            upto_index,
        )
    }

    fn return_to_live(&mut self) {
        self.view = None;
        self.state = SessionState::Live;
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> EngineResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EngineError::InvalidSessionState {
                operation,
                state: self.state,
            })
        }
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionController, SessionSnapshot, SessionState};
    use crate::ban_chess::action_codec::Action;
    use crate::ban_chess::turn_engine::{Phase, TerminalReason, TurnEngine};
    use crate::clock::elapsed_source::ManualClock;
    use crate::clock::time_control::{IncrementPolicy, TimeControl};
    use crate::engine_errors::EngineError;
    use crate::game_state::chess_types::Color;
    use crate::session::session_config::SessionConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    const OPENING: [&str; 4] = ["b:e2e4", "m:d2d4", "b:e7e5", "m:d7d5"];

    fn live_session() -> SessionController {
        let mut session = SessionController::with_elapsed_source(Box::new(ManualClock::new()));
        session
            .initialize(SessionConfig::default())
            .expect("default config");
        session
    }

    fn play(session: &mut SessionController, actions: &[&str], elapsed_ms: u64) {
        for action in actions {
            session
                .perform_timed_action(action, elapsed_ms)
                .expect("legal action");
        }
    }

    fn recorder(session: &mut SessionController) -> Rc<RefCell<Vec<SessionSnapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        seen
    }

    #[test]
    fn idle_session_rejects_actions() {
        let mut session = SessionController::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(
            session.perform_action("b:e2e4"),
            Err(EngineError::InvalidSessionState {
                operation: "perform_action",
                state: SessionState::Idle,
            })
        );
        assert!(session.save().is_err());
        assert!(session.compute_destinations_for_ui(Color::Black).is_empty());
    }

    #[test]
    fn accepted_actions_are_recorded_and_announced() {
        let mut session = live_session();
        let seen = recorder(&mut session);

        play(&mut session, &OPENING, 1_000);

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[1].notation(), "m:d2d4");
        assert_eq!(history[1].acting_color(), Color::White);
        assert_eq!(history[2].record.ply_index, 2);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        let last = &seen[3];
        assert_eq!(last.state, SessionState::Live);
        assert_eq!(last.phase, Phase::AwaitingBan);
        assert_eq!(last.acting_color, Color::Black);
        assert_eq!(Ok(last.legal_bans.clone()), session.engine().legal_bans());
        assert!(last.legal_moves.is_empty());
        assert_eq!(last.history_len, 4);
        assert_eq!(last.fen, session.engine().to_fen());
    }

    #[test]
    fn rejected_actions_leave_history_untouched() {
        let mut session = live_session();
        let seen = recorder(&mut session);
        play(&mut session, &["b:e2e4"], 500);

        assert!(matches!(
            session.perform_action("m:e2e4"),
            Err(EngineError::IllegalAction { .. })
        ));
        assert!(matches!(
            session.perform_action("b:d2d4"),
            Err(EngineError::InvalidPhase { .. })
        ));
        assert!(matches!(
            session.perform_action("m:e2"),
            Err(EngineError::MalformedNotation { .. })
        ));
        assert_eq!(session.history().len(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn elapsed_time_comes_from_the_injected_source() {
        let clock = Rc::new(RefCell::new(ManualClock::new()));

        struct Shared(Rc<RefCell<ManualClock>>);
        impl crate::clock::elapsed_source::ElapsedSource for Shared {
            fn lap_ms(&mut self) -> u64 {
                self.0.borrow_mut().lap_ms()
            }
            fn restart(&mut self) {
                self.0.borrow_mut().restart()
            }
        }

        let mut session = SessionController::with_elapsed_source(Box::new(Shared(Rc::clone(&clock))));
        session.initialize(SessionConfig::default()).expect("init");

        clock.borrow_mut().advance(2_500);
        session.perform_action("b:e2e4").expect("ban");
        clock.borrow_mut().advance(7_000);
        session.perform_action("m:d2d4").expect("move");

        let elapsed: Vec<u64> = session.history().iter().map(|e| e.elapsed_ms).collect();
        assert_eq!(elapsed, vec![2_500, 7_000]);
        // Black's ban cost 2500, white's move cost 5000 net of increment.
        let clocks = session.snapshot().clocks;
        assert_eq!(clocks.black_ms, 297_500);
        assert_eq!(clocks.white_ms, 295_000);
        assert_eq!(session.live_clock_seed(), 295_000);
    }

    #[test]
    fn undo_matches_replaying_the_prefix() {
        let mut session = live_session();
        play(&mut session, &OPENING, 1_000);

        session.undo().expect("undo");
        assert_eq!(session.history().len(), 3);

        let mut expected = TurnEngine::default();
        for text in &OPENING[..3] {
            expected
                .apply_action(text.parse::<Action>().expect("notation"))
                .expect("legal");
        }
        assert_eq!(session.engine(), &expected);
        assert_eq!(session.engine().phase(), Phase::AwaitingMove);

        for _ in 0..3 {
            session.undo().expect("undo");
        }
        assert_eq!(session.undo(), Err(EngineError::NothingToUndo));
        assert_eq!(session.engine(), &TurnEngine::default());
    }

    #[test]
    fn navigation_is_read_only() {
        let mut session = live_session();
        play(&mut session, &OPENING, 1_000);
        let canonical = session.engine().clone();
        let seen = recorder(&mut session);

        session.navigate_to(1).expect("in range");
        assert_eq!(session.state(), SessionState::ViewingHistory);
        let view = session.snapshot();
        assert_eq!(view.cursor, Some(1));
        assert_eq!(
            view.fen,
            "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 1"
        );
        // Black spent 1000 on the ban, white 1000 on a move that earned 2000.
        assert_eq!(view.clocks.black_ms, 299_000);
        assert_eq!(view.clocks.white_ms, 301_000);
        assert_eq!(session.engine(), &canonical);
        assert_eq!(session.history().len(), 4);

        session.navigate_to(-1).expect("start position");
        assert_eq!(session.snapshot().fen, session.save().expect("save").starting_fen);

        session.navigate_to(3).expect("last index");
        assert_eq!(session.state(), SessionState::Live);
        assert_eq!(session.snapshot().cursor, None);
        assert_eq!(seen.borrow().len(), 3);

        assert_eq!(
            session.navigate_to(4),
            Err(EngineError::OutOfRangeNavigation { index: 4, last: 3 })
        );
        assert!(session.navigate_to(-2).is_err());
    }

    #[test]
    fn viewing_history_blocks_undo_but_not_actions() {
        let mut session = live_session();
        play(&mut session, &OPENING, 1_000);
        session.navigate_to(0).expect("in range");

        assert!(matches!(
            session.undo(),
            Err(EngineError::InvalidSessionState { operation: "undo", .. })
        ));

        // A rejected action keeps the view.
        assert!(session.perform_action("m:c2c4").is_err());
        assert_eq!(session.state(), SessionState::ViewingHistory);

        // Actions always apply to the canonical game.
        session.perform_timed_action("b:c2c4", 10).expect("ban");
        assert_eq!(session.state(), SessionState::Live);
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.snapshot().phase, Phase::AwaitingMove);
    }

    #[test]
    fn empty_history_navigation_to_start_is_live() {
        let mut session = live_session();
        session.navigate_to(-1).expect("start is the last index");
        assert_eq!(session.state(), SessionState::Live);
    }

    #[test]
    fn save_then_load_reproduces_the_session() {
        let mut session = live_session();
        let tc = TimeControl::new(180_000, 1_000);
        session
            .initialize(
                SessionConfig::default()
                    .with_time_control(tc)
                    .with_increment_policy(IncrementPolicy::EveryAction),
            )
            .expect("init");
        play(&mut session, &OPENING, 1_500);
        play(&mut session, &["b:c2c4"], 800);

        let bytes = session.save_bytes().expect("save");
        let mut restored = live_session();
        restored.load_bytes(&bytes).expect("load");

        assert_eq!(restored.history(), session.history());
        assert_eq!(restored.engine(), session.engine());
        assert_eq!(restored.snapshot(), session.snapshot());
        assert_eq!(restored.config().time_control, tc);
        assert_eq!(restored.config().increment_policy, IncrementPolicy::EveryAction);
    }

    #[test]
    fn failed_load_changes_nothing() {
        let mut session = live_session();
        play(&mut session, &OPENING, 1_000);
        let before = session.snapshot();
        let seen = recorder(&mut session);

        let mut envelope = session.save().expect("save");
        envelope.actions[3] = "m:d7d4".to_owned();
        assert!(matches!(
            session.load(envelope),
            Err(EngineError::CorruptEnvelope { .. })
        ));

        let mut envelope = session.save().expect("save");
        envelope.schema_version = 9;
        assert!(session.load(envelope).is_err());
        assert!(session.load_bytes(b"not json").is_err());

        assert_eq!(session.snapshot(), before);
        assert_eq!(session.history().len(), 4);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let mut session = live_session();
        let seen = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&seen);
        let token = session.subscribe(move |_| *sink.borrow_mut() += 1);

        play(&mut session, &["b:e2e4"], 0);
        assert!(session.unsubscribe(token));
        assert!(!session.unsubscribe(token));
        play(&mut session, &["m:d2d4"], 0);
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn terminal_reason_and_destinations_follow_the_canonical_game() {
        let mut session = live_session();
        session
            .initialize(SessionConfig::default().with_starting_fen("7k/2P5/8/8/8/1q6/8/K7 w - - 0 1"))
            .expect("init");
        assert_eq!(session.current_terminal_reason(), None);

        let destinations = session.compute_destinations_for_ui(Color::Black);
        assert_eq!(destinations.get("c7"), Some(&vec!["c8".to_owned()]));
        assert!(session.compute_destinations_for_ui(Color::White).is_empty());

        session.perform_timed_action("b:c7c8", 0).expect("ban");
        assert_eq!(
            session.current_terminal_reason(),
            Some(TerminalReason::BannedIntoNoMoves)
        );
        assert!(session.snapshot().outcome.is_some());
        assert!(session.perform_action("m:a1b1").is_err());
    }

    #[test]
    fn initialize_rejects_a_bad_fen_and_keeps_state() {
        let mut session = live_session();
        play(&mut session, &["b:e2e4"], 0);
        assert!(matches!(
            session.initialize(SessionConfig::default().with_starting_fen("8/8 w")),
            Err(EngineError::InvalidFen { .. })
        ));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn session_id_comes_from_the_config() {
        let mut session = live_session();
        assert_eq!(session.id(), "local");
        session
            .initialize(SessionConfig::default().with_game_id("hotseat-2"))
            .expect("init");
        assert_eq!(session.id(), "hotseat-2");
    }

    #[test]
    fn confirming_while_viewing_history_refreshes_the_view_clocks() {
        let mut session = SessionController::with_elapsed_source(Box::new(ManualClock::new()));
        session
            .initialize(SessionConfig::networked("g1"))
            .expect("init");
        play(&mut session, &["b:e2e4", "m:d2d4"], 1_000);
        session.navigate_to(0).expect("navigate");
        assert_eq!(session.snapshot().clocks.black_ms, 299_000);

        session.confirm_oldest(4_000);
        assert_eq!(session.state(), SessionState::ViewingHistory);
        assert_eq!(session.snapshot().clocks.black_ms, 296_000);
        assert_eq!(session.unconfirmed_actions().len(), 1);
    }
}
