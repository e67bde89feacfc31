//! # Code Canvas Editor
//!
//! Owns the editable state of the playground.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor widget (external): text per buffer   │
//! └─────────────────────────────────────────────┘
//!                     ↓ set_buffer_value
//! ┌─────────────────────────────────────────────┐
//! │ editor: BufferStore                         │
//! │  - fixed set of named buffers               │
//! │  - active buffer selection                  │
//! │  - synchronous change notification          │
//! └─────────────────────────────────────────────┘
//!                     ↓ BufferObserver
//! ┌─────────────────────────────────────────────┐
//! │ composer / autosave scheduler               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Fixed buffer set**: names are decided at construction and never change
//! 2. **Single writer**: only the store mutates buffer text
//! 3. **Synchronous observers**: every subscriber sees a mutation before the call returns
//!
//! ## Usage
//!
//! ```rust
//! use codecanvas_editor::BufferStore;
//!
//! let mut store = BufferStore::with_default_template();
//! store.set_buffer_value("style.css", "body { color: red; }").unwrap();
//! assert_eq!(store.get_buffer("style.css").unwrap().value, "body { color: red; }");
//!
//! // The buffer set is fixed
//! assert!(store.set_buffer_value("extra.js", "").is_err());
//! ```

mod buffer;
mod errors;
mod store;
mod tabs;
mod template;
mod theme;

pub use buffer::{Buffer, Buffers, Language};
pub use errors::EditorError;
pub use store::{BufferObserver, BufferStore};
pub use tabs::ViewTab;
pub use template::{default_buffers, CSS_BUFFER, DEFAULT_ACTIVE_BUFFER, HTML_BUFFER, JS_BUFFER};
pub use theme::{EditorChrome, EditorTheme, FontStyle, ThemePalette, TokenRule};
