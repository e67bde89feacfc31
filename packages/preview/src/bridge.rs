//! # Sandbox Bridge
//!
//! State machine around one preview slot:
//!
//! ```text
//! Idle ──refresh──▶ Loading ──floor elapsed──▶ Ready ──runtime error──▶ Error
//!                      ▲                                                 │
//!                      └──────────────────refresh────────────────────────┘
//! ```
//!
//! Each refresh creates a new [`Generation`]. Console interception is
//! installed at most once per generation, and events tagged with any
//! other generation are discarded, so output from a superseded document
//! can never be attributed to the current one.

use crate::{
    ContextEvent, DiagnosticEntry, DiagnosticLog, DiagnosticSink, ExecutionContext, ExternalViewer,
    Generation, PreviewError, SandboxPolicy, Severity, Viewport,
};
use chrono::{DateTime, Utc};
use codecanvas_common::{to_delta, SharedClock};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Minimum time the loading indicator stays up after a refresh
pub const DEFAULT_LOADING_FLOOR: Duration = Duration::from_millis(500);

/// Observable state of the preview slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Drives an [`ExecutionContext`] and reports to a [`DiagnosticSink`]
pub struct SandboxBridge<C, S> {
    context: C,
    sink: S,
    clock: SharedClock,
    policy: SandboxPolicy,
    loading_floor: Duration,
    viewport: Viewport,

    /// Generation of the live context
    generation: Generation,

    /// Generation the console bridge was installed for
    console_bridge: Option<Generation>,

    /// Last document handed to `refresh`
    document: Option<String>,

    current_error: Option<String>,
    loading_until: Option<DateTime<Utc>>,
    log: DiagnosticLog,
}

impl<C: ExecutionContext, S: DiagnosticSink> SandboxBridge<C, S> {
    pub fn new(context: C, sink: S, clock: SharedClock) -> Self {
        Self {
            context,
            sink,
            clock,
            policy: SandboxPolicy::default(),
            loading_floor: DEFAULT_LOADING_FLOOR,
            viewport: Viewport::default(),
            generation: Generation::default(),
            console_bridge: None,
            document: None,
            current_error: None,
            loading_until: None,
            log: DiagnosticLog::new(),
        }
    }

    pub fn with_policy(mut self, policy: SandboxPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_loading_floor(mut self, floor: Duration) -> Self {
        self.loading_floor = floor;
        self
    }

    /// Replace the context with a clean load of `document`
    pub fn refresh(&mut self, document: &str) -> Result<Generation, PreviewError> {
        self.settle_outgoing();

        self.generation = self.generation.next();
        self.console_bridge = None;
        self.document = Some(document.to_string());
        self.loading_until = self
            .clock
            .now()
            .checked_add_signed(to_delta(self.loading_floor));
        self.set_current_error(None);

        info!(generation = %self.generation, bytes = document.len(), "Refreshing preview");

        if let Err(e) = self.load(document) {
            error!(
                target: "codecanvas::preview",
                generation = %self.generation,
                error = %e,
                "Preview load failed"
            );
            self.set_current_error(Some(format!("Preview Error: {e}")));
            return Err(e);
        }

        // Inline scripts run while the document is written
        self.pump();
        Ok(self.generation)
    }

    /// Refresh with the last document again
    pub fn rerun(&mut self) -> Result<Generation, PreviewError> {
        let document = self.document.clone().ok_or(PreviewError::NothingToRender)?;
        self.refresh(&document)
    }

    fn load(&mut self, document: &str) -> Result<(), PreviewError> {
        self.context.reset(self.generation, &self.policy)?;
        self.ensure_console_bridge()?;
        self.context.install_error_handlers(self.generation)?;
        self.context.write_document(document)
    }

    /// Install console interception for the live context if not done yet
    pub fn ensure_console_bridge(&mut self) -> Result<(), PreviewError> {
        if self.generation.is_initial() || self.console_bridge == Some(self.generation) {
            return Ok(());
        }

        self.context.install_console_bridge(self.generation)?;
        self.console_bridge = Some(self.generation);
        debug!(generation = %self.generation, "Console bridge installed");
        Ok(())
    }

    /// Route queued context events. Returns how many were accepted.
    pub fn pump(&mut self) -> usize {
        let events = self.context.drain_events();
        let mut accepted = 0;

        for event in events {
            if event.generation() != self.generation {
                debug!(
                    event_generation = %event.generation(),
                    live_generation = %self.generation,
                    "Dropping event from superseded preview"
                );
                continue;
            }

            self.route(event);
            accepted += 1;
        }

        accepted
    }

    /// Deliver console output the outgoing context already produced.
    /// Its runtime errors and rejections are discarded.
    fn settle_outgoing(&mut self) {
        for event in self.context.drain_events() {
            if event.generation() != self.generation {
                continue;
            }

            match event {
                ContextEvent::Console { .. } => self.route(event),
                _ => debug!(
                    generation = %self.generation,
                    "Discarding error from replaced preview"
                ),
            }
        }
    }

    fn route(&mut self, event: ContextEvent) {
        match event {
            ContextEvent::Console { severity, message, .. } => {
                forward_to_host_log(severity, &message);

                let entry = DiagnosticEntry {
                    severity,
                    message,
                    captured_at: self.clock.now(),
                };
                self.sink.diagnostic_appended(&entry);
                self.log.push(entry);
            }
            ContextEvent::RuntimeError { message, line, .. } => {
                let text = format!("{message} at line {line}");
                error!(target: "codecanvas::preview", "[Preview JavaScript Error] {}", text);
                self.set_current_error(Some(text));
            }
            ContextEvent::UnhandledRejection { reason, .. } => {
                let text = format!("Unhandled Promise Rejection: {reason}");
                error!(target: "codecanvas::preview", "[Preview Promise Rejection] {}", text);
                self.set_current_error(Some(text));
            }
        }
    }

    /// Collect events and end the loading floor once it has elapsed.
    /// Returns true when the preview became ready during this tick.
    pub fn tick(&mut self) -> bool {
        self.pump();

        match self.loading_until {
            Some(until) if self.clock.now() >= until => {
                self.loading_until = None;
                debug!(generation = %self.generation, "Preview ready");
                self.sink.preview_ready(self.generation);
                true
            }
            _ => false,
        }
    }

    /// Show the last document in an independent window, without diagnostics
    pub fn open_external(&self, viewer: &mut dyn ExternalViewer) -> Result<(), PreviewError> {
        let document = self.document.as_deref().ok_or(PreviewError::NothingToRender)?;
        viewer.open(document).map_err(|e| {
            warn!(error = %e, "Could not open preview in a new window");
            e
        })
    }

    fn set_current_error(&mut self, error: Option<String>) {
        if self.current_error == error {
            return;
        }
        self.current_error = error;
        self.sink.current_error_changed(self.current_error.as_deref());
    }

    pub fn state(&self) -> BridgeState {
        if self.generation.is_initial() {
            BridgeState::Idle
        } else if self.loading_until.is_some() {
            BridgeState::Loading
        } else if self.current_error.is_some() {
            BridgeState::Error
        } else {
            BridgeState::Ready
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_until.is_some()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.current_error.as_deref()
    }

    /// Dismiss the error banner without reloading
    pub fn dismiss_error(&mut self) {
        self.set_current_error(None);
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn clear_diagnostics(&mut self) {
        self.log.clear();
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

/// Mirror preview console output into the host's own log
fn forward_to_host_log(severity: Severity, message: &str) {
    match severity {
        Severity::Error => error!(target: "codecanvas::preview", "[Preview Error] {}", message),
        Severity::Warn => warn!(target: "codecanvas::preview", "[Preview Warning] {}", message),
        Severity::Info => info!(target: "codecanvas::preview", "[Preview Info] {}", message),
        Severity::Log => debug!(target: "codecanvas::preview", "[Preview] {}", message),
    }
}
