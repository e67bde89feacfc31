//! # Autosave Debounce
//!
//! One [`TimerSlot`] shared between the engine and a [`BufferObserver`]
//! registered on the buffer store. Each edit re-arms the slot, so the
//! save happens one delay after the *last* edit.

use codecanvas_common::{SharedClock, TimerId, TimerSlot};
use codecanvas_editor::{Buffer, BufferObserver, Buffers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// Quiet period before buffer edits are saved
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct Debouncer {
    slot: Rc<RefCell<TimerSlot>>,
    clock: SharedClock,
    delay: Duration,
}

impl Debouncer {
    pub fn new(clock: SharedClock, delay: Duration) -> Self {
        Self {
            slot: Rc::new(RefCell::new(TimerSlot::new())),
            clock,
            delay,
        }
    }

    /// (Re)start the quiet period
    pub fn arm(&self) -> TimerId {
        let id = self.slot.borrow_mut().arm(self.clock.now(), self.delay);
        trace!(?id, "Autosave armed");
        id
    }

    pub fn cancel(&self) -> Option<TimerId> {
        self.slot.borrow_mut().cancel()
    }

    pub fn is_armed(&self) -> bool {
        self.slot.borrow().is_armed()
    }

    /// Consume the pending deadline if the quiet period has passed
    pub fn fire_if_due(&self) -> Option<TimerId> {
        self.slot.borrow_mut().fire_if_due(self.clock.now())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Buffer observer that re-arms the autosave on every edit
pub struct AutosaveTrigger {
    debouncer: Debouncer,
}

impl AutosaveTrigger {
    pub fn new(debouncer: Debouncer) -> Self {
        Self { debouncer }
    }
}

impl BufferObserver for AutosaveTrigger {
    fn buffer_changed(&mut self, _changed: &Buffer, _buffers: &Buffers) {
        self.debouncer.arm();
    }
}
