//! # Single-slot Timer
//!
//! At most one pending deadline exists at any time. Arming replaces the
//! pending deadline (last-arm-wins), cancelling clears it, and firing
//! consumes it. The slot never schedules anything by itself: its owner
//! polls [`TimerSlot::fire_if_due`] with the current time, which keeps
//! behaviour deterministic under a virtual clock.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Identity of one arming of a [`TimerSlot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: TimerId,
    deadline: DateTime<Utc>,
}

/// Cancellable single-slot timer
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<Pending>,
    next_id: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot `delay` after `now`, superseding any pending deadline
    pub fn arm(&mut self, now: DateTime<Utc>, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let deadline = now
            .checked_add_signed(crate::to_delta(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.pending = Some(Pending { id, deadline });
        id
    }

    /// Drop the pending deadline, returning its id if there was one
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.pending.take().map(|p| p.id)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.map(|p| p.deadline)
    }

    /// Consume the pending deadline if it has been reached
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> Option<TimerId> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.id)
            }
            _ => None,
        }
    }
}
