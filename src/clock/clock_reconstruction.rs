//! Historical clock readings derived from a history log.
//!
//! Nothing here ticks. A reading is a pure function of the logged elapsed
//! times, so the same log always reconstructs the same clocks. The live
//! countdown belongs to the host and is only seeded from these values.

use serde::Serialize;

use crate::ban_chess::history::HistoryEntry;
use crate::clock::time_control::{IncrementPolicy, TimeControl};
use crate::game_state::chess_types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockSnapshot {
    pub white_ms: u64,
    pub black_ms: u64,
    pub white_flagged: bool,
    pub black_flagged: bool,
}

impl ClockSnapshot {
    pub const fn fresh(time_control: TimeControl) -> Self {
        Self {
            white_ms: time_control.initial_duration_ms,
            black_ms: time_control.initial_duration_ms,
            white_flagged: false,
            black_flagged: false,
        }
    }

    #[inline]
    pub const fn remaining(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_ms,
            Color::Black => self.black_ms,
        }
    }

    #[inline]
    pub const fn flagged(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_flagged,
            Color::Black => self.black_flagged,
        }
    }

    fn charge(&mut self, color: Color, elapsed_ms: u64, increment_ms: u64) {
        let (remaining, flagged) = match color {
            Color::White => (&mut self.white_ms, &mut self.white_flagged),
            Color::Black => (&mut self.black_ms, &mut self.black_flagged),
        };
        if *flagged {
            return;
        }

        match remaining.checked_sub(elapsed_ms) {
            Some(left) => *remaining = left.saturating_add(increment_ms),
            None => {
                *remaining = 0;
                *flagged = true;
            }
        }
    }
}

/// Clocks after entries `0..=upto_index` have been charged.
///
/// `None` means before the first entry. Indices past the end are clamped to
/// the last entry.
pub fn clocks_at_ply(
    entries: &[HistoryEntry],
    time_control: TimeControl,
    policy: IncrementPolicy,
    upto_index: Option<usize>,
) -> ClockSnapshot {
    let mut clocks = ClockSnapshot::fresh(time_control);
    let Some(upto) = upto_index else {
        return clocks;
    };

    for entry in entries.iter().take(upto.saturating_add(1)) {
        let increment = if policy.rewards(entry.is_ban()) {
            time_control.increment_ms
        } else {
            0
        };
        clocks.charge(entry.acting_color(), entry.elapsed_ms, increment);
    }
    clocks
}

/// Remaining time for `acting_color` at the end of the log, used to (re)start
/// the host's live countdown after any phase or side change.
pub fn live_clock_seed(
    entries: &[HistoryEntry],
    time_control: TimeControl,
    policy: IncrementPolicy,
    acting_color: Color,
) -> u64 {
    clocks_at_ply(
        entries,
        time_control,
        policy,
        entries.len().checked_sub(1),
    )
    .remaining(acting_color)
}
