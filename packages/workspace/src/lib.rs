//! # Code Canvas Workspace
//!
//! The [`Playground`] ties the components into one session:
//!
//! - buffer edits recompose the document and refresh the preview
//! - edits also arm the autosave, which [`Playground::tick`] performs
//! - selection changes (active buffer, tab, theme) are saved immediately
//! - everything the host UI needs arrives through [`Playground::drain_events`]
//!
//! ```rust
//! use codecanvas_common::ManualClock;
//! use codecanvas_persistence::MemoryStorage;
//! use codecanvas_preview::{HeadlessContext, RecordingViewer};
//! use codecanvas_workspace::{Command, Playground, PlaygroundConfig};
//! use std::rc::Rc;
//!
//! let mut playground = Playground::start(
//!     PlaygroundConfig::default(),
//!     HeadlessContext::new(),
//!     RecordingViewer::default(),
//!     MemoryStorage::new(),
//!     Rc::new(ManualClock::at_epoch()),
//! )
//! .unwrap();
//!
//! playground
//!     .dispatch(Command::EditBuffer {
//!         name: "style.css".to_string(),
//!         text: "h1 { color: teal; }".to_string(),
//!     })
//!     .unwrap();
//! assert!(playground.composed_document().contains("h1 { color: teal; }"));
//! ```

mod config;
mod errors;
mod events;
mod keymap;
mod playground;
mod relay;

pub use config::PlaygroundConfig;
pub use errors::{ConfigError, PlaygroundError};
pub use events::{EventQueue, NoticeLevel, PlaygroundEvent};
pub use keymap::{KeyChord, KeyPress, Keymap};
pub use playground::{Command, Playground};
pub use relay::{ComposedDocument, CompositionRelay};
