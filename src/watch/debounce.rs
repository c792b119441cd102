// src/watch/debounce.rs

use std::time::{Duration, Instant};

/// Default quiescence interval between two accepted reloads.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_secs(1);

/// Single "last accepted reload" timestamp for a whole watch set.
///
/// An event is accepted only if at least `interval` has elapsed since the
/// previously accepted one. Rejected events are dropped, not deferred.
#[derive(Debug, Clone)]
pub struct DebounceWindow {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl DebounceWindow {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// Accept the event at `now` if the window has elapsed, recording it.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

impl Default for DebounceWindow {
    fn default() -> Self {
        Self::new(DEFAULT_QUIESCENCE)
    }
}
