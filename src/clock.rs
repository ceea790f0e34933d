//! Per-side countdown clocks and the recurring tick that drives them
//!
//! A [`CountdownClock`] only knows how much time its side has left. Whether it
//! runs is never stored: it is derived from the side to move each time a tick
//! arrives. [`TickSchedule`] is the cancellable recurring task that produces
//! those ticks for exactly one side at a time.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::board::Side;
use crate::session::SessionState;

/// Fallback starting time per side (3 minutes)
pub const DEFAULT_STARTING_MS: u64 = 180_000;

/// Fallback tick interval
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Below this many whole seconds a running clock is shown as low
pub const LOW_TIME_SECS: u64 = 30;

/// Signal emitted when a side's clock reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUp {
    pub side: Side,
}

/// Remaining time for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownClock {
    #[serde(skip, default = "default_side")]
    side: Side,
    remaining_ms: u64,
    /// Set once the expiry signal has fired for the current zero-crossing
    #[serde(default)]
    expired: bool,
}

fn default_side() -> Side {
    Side::White
}

impl CountdownClock {
    pub fn new(side: Side, starting_ms: u64) -> Self {
        Self {
            side,
            remaining_ms: starting_ms,
            expired: false,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// A clock runs only while its side is the one to move
    #[inline]
    pub fn is_active(&self, active_side: Side) -> bool {
        self.side == active_side
    }

    /// Consume one tick interval.
    ///
    /// Does nothing when the clock is not active or already at zero. The
    /// tick that reaches zero returns the expiry signal; later ticks are
    /// silent no-ops.
    pub fn on_tick(&mut self, active_side: Side, interval_ms: u64) -> Option<TimeUp> {
        if !self.is_active(active_side) || self.remaining_ms == 0 {
            return None;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(interval_ms);
        if self.remaining_ms > 0 || self.expired {
            return None;
        }

        self.expired = true;
        Some(TimeUp { side: self.side })
    }

    /// Overwrite the remaining time with an authoritative value.
    ///
    /// Setting a positive value starts a new zero-crossing. Setting zero on a
    /// clock that has not fired yet is itself the crossing and returns the
    /// expiry signal; an already fired expiry stays silent.
    pub fn resync(&mut self, remaining_ms: u64) -> Option<TimeUp> {
        self.remaining_ms = remaining_ms;
        if remaining_ms > 0 {
            self.expired = false;
            return None;
        }
        if self.expired {
            return None;
        }

        self.expired = true;
        Some(TimeUp { side: self.side })
    }

    /// Serialized clocks do not carry their side; the owner restores it.
    pub(crate) fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}

/// Format milliseconds as `MM:SS`, rounding down to whole seconds
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Less than thirty whole seconds left, but not yet flagged
pub fn is_low_time(ms: u64) -> bool {
    let secs = ms / 1000;
    secs < LOW_TIME_SECS && secs > 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    side: Side,
    next_due: Instant,
}

/// Recurring clock tick for whichever side is to move.
///
/// At most one side is armed. Every decision re-reads the side to move from
/// the session state instead of trusting what was armed earlier, so a tick
/// scheduled for one side can never land on the other.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    armed: Option<Armed>,
}

impl TickSchedule {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms.max(1)),
            armed: None,
        }
    }

    /// Side currently armed, if any
    #[inline]
    pub fn armed_side(&self) -> Option<Side> {
        self.armed.map(|a| a.side)
    }

    #[inline]
    pub fn next_due(&self) -> Option<Instant> {
        self.armed.map(|a| a.next_due)
    }

    /// Stop the recurring tick
    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            tracing::debug!(side = %armed.side, "clock tick cancelled");
        }
    }

    /// Bring the schedule in line with the state.
    ///
    /// The side to move gets a running tick unless its clock is already at
    /// zero or `frozen` is set. Switching sides cancels the old tick and
    /// starts a fresh interval for the new side.
    pub fn sync(&mut self, state: &SessionState, now: Instant, frozen: bool) {
        let side = state.active_side();
        let wanted = if frozen || state.clock(side).remaining_ms() == 0 {
            None
        } else {
            Some(side)
        };

        if self.armed_side() == wanted {
            return;
        }

        self.cancel();
        if let Some(side) = wanted {
            tracing::debug!(side = %side, "clock tick armed");
            self.armed = Some(Armed {
                side,
                next_due: now + self.interval,
            });
        }
    }

    /// Take one due tick, if the deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<Side> {
        let armed = self.armed.as_mut()?;
        if now < armed.next_due {
            return None;
        }
        armed.next_due += self.interval;
        Some(armed.side)
    }
}
