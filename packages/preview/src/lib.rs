//! # Code Canvas Preview
//!
//! Renders the composed document in an isolated execution context and
//! carries diagnostics back to the host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ composer: composed document (String)        │
//! └─────────────────────────────────────────────┘
//!                     ↓ refresh
//! ┌─────────────────────────────────────────────┐
//! │ SandboxBridge                               │
//! │  - new generation per refresh               │
//! │  - console bridge installed once/generation │
//! │  - runtime error / rejection capture        │
//! │  - loading floor                            │
//! └─────────────────────────────────────────────┘
//!          ↓ ExecutionContext      ↑ ContextEvent
//! ┌─────────────────────────────────────────────┐
//! │ host context (iframe, headless, ...)        │
//! └─────────────────────────────────────────────┘
//!                     ↓ DiagnosticSink
//! ┌─────────────────────────────────────────────┐
//! │ host UI: console panel, error banner        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Clean load**: every refresh replaces the whole context, never patches it
//! 2. **Generation tagging**: events from a superseded context are dropped
//! 3. **Single error slot**: the current error is replaced, not accumulated
//! 4. **Allow-list isolation**: capabilities are denied unless listed

mod bridge;
mod context;
mod diagnostics;
mod errors;
mod headless;
mod policy;
mod viewport;

pub use bridge::{BridgeState, SandboxBridge, DEFAULT_LOADING_FLOOR};
pub use context::{ContextEvent, ExecutionContext, ExternalViewer, Generation};
pub use diagnostics::{DiagnosticEntry, DiagnosticLog, DiagnosticSink, Severity};
pub use errors::PreviewError;
pub use headless::{HeadlessContext, RecordingSink, RecordingViewer, SinkEvent};
pub use policy::{SandboxCapability, SandboxPolicy};
pub use viewport::Viewport;
