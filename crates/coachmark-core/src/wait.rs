//! Bounded, cancellable polling.
//!
//! Hosts rarely offer a reliable "element mounted" signal, so the engine
//! re-checks on a fixed interval instead. Each [`Wait`] is owned by the
//! [`WaitSet`] of one tour run and dies with it: entering another step or
//! ending the run cancels every outstanding wait, so a stale poll can never
//! act on a run that no longer exists.

use std::time::{Duration, Instant};

use serde::Serialize;

/// What a wait is waiting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WaitPurpose {
    /// The step's target has not mounted yet
    TargetMount { element_id: String },
    /// The element whose click completes the step has not mounted yet
    ActionMount { element_id: String },
    /// Periodic re-evaluation of field predicates
    FieldWatch,
}

/// Result of checking a wait at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPoll {
    /// Next check is still in the future
    NotDue,
    /// Time to re-check the condition
    Due,
    /// Timeout elapsed without the condition holding
    Expired,
}

/// One pending condition.
#[derive(Debug, Clone)]
pub struct Wait {
    pub purpose: WaitPurpose,
    started_at: Instant,
    next_check: Instant,
    interval: Duration,
    timeout: Option<Duration>,
}

impl Wait {
    pub fn new(purpose: WaitPurpose, now: Instant, interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            purpose,
            started_at: now,
            next_check: now + interval,
            interval,
            timeout,
        }
    }

    pub fn poll(&self, now: Instant) -> WaitPoll {
        if let Some(timeout) = self.timeout {
            if now.saturating_duration_since(self.started_at) >= timeout {
                return WaitPoll::Expired;
            }
        }
        if now >= self.next_check {
            WaitPoll::Due
        } else {
            WaitPoll::NotDue
        }
    }

    /// Schedules the next check one interval after `now`.
    pub fn reschedule(&mut self, now: Instant) {
        self.next_check = now + self.interval;
    }
}

/// The waits owned by one tour run.
#[derive(Debug, Default)]
pub struct WaitSet {
    waits: Vec<Wait>,
    cancelled: u64,
}

impl WaitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wait unless one with the same purpose is already pending.
    pub fn add(&mut self, wait: Wait) -> bool {
        if self.contains(&wait.purpose) {
            return false;
        }
        self.waits.push(wait);
        true
    }

    pub fn contains(&self, purpose: &WaitPurpose) -> bool {
        self.waits.iter().any(|w| &w.purpose == purpose)
    }

    /// Purposes that need attention at `now`, with whether each has expired.
    pub fn due(&self, now: Instant) -> Vec<(WaitPurpose, WaitPoll)> {
        self.waits
            .iter()
            .filter_map(|w| match w.poll(now) {
                WaitPoll::NotDue => None,
                poll => Some((w.purpose.clone(), poll)),
            })
            .collect()
    }

    /// Removes a wait whose condition was met or which expired.
    pub fn resolve(&mut self, purpose: &WaitPurpose) -> bool {
        let before = self.waits.len();
        self.waits.retain(|w| &w.purpose != purpose);
        before != self.waits.len()
    }

    pub fn reschedule(&mut self, purpose: &WaitPurpose, now: Instant) {
        if let Some(wait) = self.waits.iter_mut().find(|w| &w.purpose == purpose) {
            wait.reschedule(now);
        }
    }

    /// Cancels every outstanding wait. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.waits.len();
        self.cancelled += count as u64;
        self.waits.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.waits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wait> {
        self.waits.iter()
    }

    /// Total waits cancelled over the set's lifetime.
    pub fn cancelled_total(&self) -> u64 {
        self.cancelled
    }
}
