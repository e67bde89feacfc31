//! # Buffer Store
//!
//! Single mutable source of truth for buffer text and the active-buffer
//! selection. Every successful mutation notifies all registered
//! [`BufferObserver`]s synchronously, before the mutating call returns.

use crate::{default_buffers, Buffer, Buffers, EditorError, DEFAULT_ACTIVE_BUFFER};
use tracing::{debug, warn};

/// Subscriber to buffer mutations
pub trait BufferObserver {
    /// Called after `changed` received its new value. `buffers` is the
    /// whole set as of that moment.
    fn buffer_changed(&mut self, changed: &Buffer, buffers: &Buffers);
}

/// Owns the fixed buffer set and the active selection
pub struct BufferStore {
    buffers: Buffers,

    /// Index of the active buffer in `buffers`
    active: usize,

    /// Incremented on each value mutation
    version: u64,

    observers: Vec<Box<dyn BufferObserver>>,
}

impl BufferStore {
    /// Create a store over a buffer set, with `active` selected
    pub fn new(buffers: Buffers, active: &str) -> Result<Self, EditorError> {
        let Some(active) = buffers.index_of(active) else {
            return Err(EditorError::UnknownBuffer(active.to_string()));
        };

        Ok(Self {
            buffers,
            active,
            version: 0,
            observers: Vec::new(),
        })
    }

    /// Store holding the three starter buffers
    pub fn with_default_template() -> Self {
        let buffers = default_buffers();
        let active = buffers.index_of(DEFAULT_ACTIVE_BUFFER).unwrap_or(0);

        Self {
            buffers,
            active,
            version: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer for all future mutations
    pub fn subscribe(&mut self, observer: Box<dyn BufferObserver>) {
        self.observers.push(observer);
    }

    pub fn get_buffer(&self, name: &str) -> Result<&Buffer, EditorError> {
        self.buffers
            .get(name)
            .ok_or_else(|| EditorError::UnknownBuffer(name.to_string()))
    }

    /// Replace a buffer's text, keeping its identity and language.
    ///
    /// Unknown names leave the store untouched.
    pub fn set_buffer_value(
        &mut self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<(), EditorError> {
        let Some(buffer) = self.buffers.get_mut(name) else {
            warn!(buffer = %name, "Ignoring edit of unknown buffer");
            return Err(EditorError::UnknownBuffer(name.to_string()));
        };

        buffer.value = text.into();
        self.version += 1;
        debug!(buffer = %name, version = self.version, "Buffer updated");

        // Disjoint field borrows: observers mutably, buffers shared
        let buffers = &self.buffers;
        if let Some(changed) = buffers.get(name) {
            for observer in self.observers.iter_mut() {
                observer.buffer_changed(changed, buffers);
            }
        }

        Ok(())
    }

    /// Replace the active buffer's text
    pub fn set_active_value(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        let active = self.active_buffer().name.clone();
        self.set_buffer_value(&active, text)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), EditorError> {
        let Some(index) = self.buffers.index_of(name) else {
            warn!(buffer = %name, "Cannot select unknown buffer");
            return Err(EditorError::UnknownBuffer(name.to_string()));
        };

        self.active = index;
        Ok(())
    }

    pub fn get_active(&self) -> &str {
        &self.active_buffer().name
    }

    pub fn active_buffer(&self) -> &Buffer {
        self.buffers.at(self.active)
    }

    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

impl std::fmt::Debug for BufferStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferStore")
            .field("buffers", &self.buffers)
            .field("active", &self.get_active())
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}
