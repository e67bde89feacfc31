//! # Headless Context
//!
//! In-process stand-ins for the browser side of the bridge. They keep a
//! record of everything the bridge asked for, and let callers inject the
//! events a real page would produce.

use crate::{
    ContextEvent, DiagnosticEntry, DiagnosticSink, ExecutionContext, ExternalViewer, Generation,
    PreviewError, SandboxPolicy, Severity,
};

/// Execution context without a browser
#[derive(Debug, Default)]
pub struct HeadlessContext {
    generation: Generation,
    sandbox_attribute: Option<String>,
    documents: Vec<String>,
    console_installs: Vec<Generation>,
    handler_installs: Vec<Generation>,
    queue: Vec<ContextEvent>,
    fail_next_reset: Option<String>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the live context
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Every document written, oldest first
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn sandbox_attribute(&self) -> Option<&str> {
        self.sandbox_attribute.as_deref()
    }

    /// Number of console bridge installs for a generation
    pub fn console_installs(&self, generation: Generation) -> usize {
        self.console_installs.iter().filter(|g| **g == generation).count()
    }

    pub fn handler_installs(&self, generation: Generation) -> usize {
        self.handler_installs.iter().filter(|g| **g == generation).count()
    }

    /// Make the next reset fail with `message`
    pub fn fail_next_reset(&mut self, message: impl Into<String>) {
        self.fail_next_reset = Some(message.into());
    }

    /// Script in the live context calls `console.<severity>(message)`.
    /// Calls are only forwarded once the console bridge is installed.
    pub fn console(&mut self, severity: Severity, message: impl Into<String>) {
        if self.console_installs(self.generation) > 0 {
            self.queue.push(ContextEvent::Console {
                generation: self.generation,
                severity,
                message: message.into(),
            });
        }
    }

    /// Script in the live context throws an uncaught error
    pub fn throw(&mut self, message: impl Into<String>, line: u32) {
        if self.handler_installs(self.generation) > 0 {
            self.queue.push(ContextEvent::RuntimeError {
                generation: self.generation,
                message: message.into(),
                line,
            });
        }
    }

    /// A promise in the live context rejects without a handler
    pub fn reject(&mut self, reason: impl Into<String>) {
        if self.handler_installs(self.generation) > 0 {
            self.queue.push(ContextEvent::UnhandledRejection {
                generation: self.generation,
                reason: reason.into(),
            });
        }
    }

    /// Queue an arbitrary event, e.g. a late callback from an old context
    pub fn emit(&mut self, event: ContextEvent) {
        self.queue.push(event);
    }
}

impl ExecutionContext for HeadlessContext {
    fn reset(
        &mut self,
        generation: Generation,
        policy: &SandboxPolicy,
    ) -> Result<(), PreviewError> {
        if let Some(message) = self.fail_next_reset.take() {
            return Err(PreviewError::ContextUnavailable(message));
        }

        self.generation = generation;
        self.sandbox_attribute = Some(policy.attribute());
        Ok(())
    }

    fn install_console_bridge(&mut self, generation: Generation) -> Result<(), PreviewError> {
        self.console_installs.push(generation);
        Ok(())
    }

    fn install_error_handlers(&mut self, generation: Generation) -> Result<(), PreviewError> {
        self.handler_installs.push(generation);
        Ok(())
    }

    fn write_document(&mut self, document: &str) -> Result<(), PreviewError> {
        self.documents.push(document.to_string());
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<ContextEvent> {
        std::mem::take(&mut self.queue)
    }
}

/// Viewer that remembers what it was asked to open
#[derive(Debug, Default)]
pub struct RecordingViewer {
    pub opened: Vec<String>,
}

impl ExternalViewer for RecordingViewer {
    fn open(&mut self, document: &str) -> Result<(), PreviewError> {
        self.opened.push(document.to_string());
        Ok(())
    }
}

/// Notification received by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Diagnostic(DiagnosticEntry),
    CurrentError(Option<String>),
    Ready(Generation),
}

/// Sink that keeps every notification in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl DiagnosticSink for RecordingSink {
    fn diagnostic_appended(&mut self, entry: &DiagnosticEntry) {
        self.events.push(SinkEvent::Diagnostic(entry.clone()));
    }

    fn current_error_changed(&mut self, error: Option<&str>) {
        self.events.push(SinkEvent::CurrentError(error.map(str::to_string)));
    }

    fn preview_ready(&mut self, generation: Generation) {
        self.events.push(SinkEvent::Ready(generation));
    }
}
