//! Where a session gets "time spent on this action" from.

use chrono::{DateTime, Utc};

pub trait ElapsedSource {
    /// Milliseconds since the previous lap (or restart), and start a new lap.
    fn lap_ms(&mut self) -> u64;

    /// Start timing from now, discarding the running lap.
    fn restart(&mut self);
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    lap_started: DateTime<Utc>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            lap_started: Utc::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ElapsedSource for SystemClock {
    fn lap_ms(&mut self) -> u64 {
        let now = Utc::now();
        // A clock stepping backwards counts as zero elapsed time.
        let elapsed = (now - self.lap_started).num_milliseconds().max(0) as u64;
        self.lap_started = now;
        elapsed
    }

    fn restart(&mut self) {
        self.lap_started = Utc::now();
    }
}

/// Hand-advanced clock for tests and for hosts that measure time themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualClock {
    pending_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.pending_ms = self.pending_ms.saturating_add(ms);
    }
}

impl ElapsedSource for ManualClock {
    fn lap_ms(&mut self) -> u64 {
        std::mem::take(&mut self.pending_ms)
    }

    fn restart(&mut self) {
        self.pending_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{ElapsedSource, ManualClock, SystemClock};
    use chrono::{Duration, Utc};

    #[test]
    fn manual_clock_reports_each_lap_once() {
        let mut clock = ManualClock::new();
        clock.advance(1_200);
        clock.advance(300);
        assert_eq!(clock.lap_ms(), 1_500);
        assert_eq!(clock.lap_ms(), 0);

        clock.advance(50);
        clock.restart();
        assert_eq!(clock.lap_ms(), 0);
    }

    #[test]
    fn system_clock_measures_a_fresh_lap_as_short() {
        let mut clock = SystemClock::new();
        assert!(clock.lap_ms() < 60_000);
    }

    #[test]
    fn system_clock_stepping_backwards_counts_as_zero() {
        let mut clock = SystemClock {
            lap_started: Utc::now() + Duration::seconds(30),
        };
        assert_eq!(clock.lap_ms(), 0);
        // The lap restarted from the current time, not the future one.
        assert!(clock.lap_ms() < 60_000);
    }
}
