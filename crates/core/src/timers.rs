use crate::player::PlayerIdentity;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

/// Work postponed to a later server tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    GivePin(PlayerIdentity),
}

#[derive(Debug)]
struct Timer {
    at: DateTime<Utc>,
    seq: u64,
    action: DeferredAction,
}

/// Deadline-ordered queue of deferred actions. Nothing runs by itself: the
/// tick loop drains due actions with [`Timers::run_due`].
#[derive(Debug, Default)]
pub struct Timers {
    inner: Mutex<TimersInner>,
}

#[derive(Debug, Default)]
struct TimersInner {
    next_seq: u64,
    pending: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Timers {
        Default::default()
    }

    pub fn schedule(&self, at: DateTime<Utc>, action: DeferredAction) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.pending.push(Timer { at, seq, action });
    }

    /// Removes and returns every action whose deadline is at or before `now`,
    /// earliest first.
    pub fn run_due(&self, now: DateTime<Utc>) -> Vec<DeferredAction> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            inner.pending.drain(..).partition(|timer| timer.at <= now);
        inner.pending = pending;
        due.sort_by_key(|timer| (timer.at, timer.seq));
        due.into_iter().map(|timer| timer.action).collect()
    }

    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .clear();
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
