//! # Execution Context
//!
//! The host-provided isolated environment a preview runs in. The bridge
//! drives it through a fixed sequence per refresh:
//!
//! ```text
//! reset(generation) → install_console_bridge → install_error_handlers → write_document
//! ```
//!
//! Captured events are queued by the context and collected by the bridge
//! through [`ExecutionContext::drain_events`]. Each event carries the
//! generation of the context that produced it.

use crate::{PreviewError, SandboxPolicy, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one context lifetime. Zero means no context has been created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Event surfaced by a preview context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextEvent {
    Console {
        generation: Generation,
        severity: Severity,
        message: String,
    },
    RuntimeError {
        generation: Generation,
        message: String,
        line: u32,
    },
    UnhandledRejection {
        generation: Generation,
        reason: String,
    },
}

impl ContextEvent {
    pub fn generation(&self) -> Generation {
        match self {
            ContextEvent::Console { generation, .. }
            | ContextEvent::RuntimeError { generation, .. }
            | ContextEvent::UnhandledRejection { generation, .. } => *generation,
        }
    }
}

/// Isolated context the composed document runs in
pub trait ExecutionContext {
    /// Tear down the current context and create a blank one for `generation`
    fn reset(&mut self, generation: Generation, policy: &SandboxPolicy) -> Result<(), PreviewError>;

    /// Wrap log/info/warn/error so each call also queues a console event
    fn install_console_bridge(&mut self, generation: Generation) -> Result<(), PreviewError>;

    /// Hook uncaught errors and unhandled rejections
    fn install_error_handlers(&mut self, generation: Generation) -> Result<(), PreviewError>;

    /// Load the full document into the blank context
    fn write_document(&mut self, document: &str) -> Result<(), PreviewError>;

    /// Take all events queued since the last drain
    fn drain_events(&mut self) -> Vec<ContextEvent>;
}

/// Fire-and-forget top-level view of a document (no diagnostics)
pub trait ExternalViewer {
    fn open(&mut self, document: &str) -> Result<(), PreviewError>;
}
