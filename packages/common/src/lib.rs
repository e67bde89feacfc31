//! # Code Canvas Common
//!
//! Time primitives shared by the preview and persistence layers.
//!
//! Every time-dependent decision in the playground (autosave debounce,
//! the preview loading floor, diagnostic timestamps) reads time through a
//! [`Clock`] so the whole pipeline can be driven by a [`ManualClock`] in
//! tests instead of real wall time.

mod clock;
mod timer;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use timer::{TimerId, TimerSlot};

/// Convert a std duration into a chrono delta, saturating on overflow.
pub fn to_delta(duration: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::max_value())
}
