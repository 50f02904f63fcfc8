//! Elapsed-time clock.
//!
//! The session never owns a timer. Something outside calls
//! [`WorkoutSession::tick`] about once a second, and the tick only counts
//! while the session is running. [`Ticker`] is a small helper for hosts that
//! poll instead of running a periodic timer: it turns wall-clock progress into
//! the number of whole-second ticks that are due.

use crate::{SessionPhase, WorkoutSession};
use std::time::{Duration, Instant};

impl WorkoutSession {
    /// Advance elapsed time by one second if the session is running.
    ///
    /// Returns whether the clock advanced. Ticks while idle or paused are
    /// dropped, not queued.
    pub fn tick(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        true
    }
}

/// Converts wall-clock time into whole-second ticks
#[derive(Clone, Debug)]
pub struct Ticker {
    last: Instant,
    carry: Duration,
}

impl Ticker {
    pub fn new(now: Instant) -> Self {
        Self {
            last: now,
            carry: Duration::ZERO,
        }
    }

    /// Number of ticks due since the previous poll.
    ///
    /// Sub-second remainders carry over to the next poll.
    pub fn due(&mut self, now: Instant) -> u64 {
        let total = self.carry + now.saturating_duration_since(self.last);
        self.last = self.last.max(now);

        let ticks = total.as_secs();
        self.carry = total - Duration::from_secs(ticks);
        ticks
    }

    /// Poll and apply all due ticks to `session`
    pub fn drive(&mut self, session: &mut WorkoutSession, now: Instant) -> u64 {
        let due = self.due(now);
        for _ in 0..due {
            session.tick();
        }
        due
    }
}
