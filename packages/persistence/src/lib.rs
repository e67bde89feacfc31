//! # Code Canvas Persistence
//!
//! Owns everything that touches durable storage.
//!
//! ## Storage layout
//!
//! ```text
//! codecanvas:files        {"index.html": {"language": "html", "value": "..."}, ...}
//! codecanvas:active-file  index.html
//! codecanvas:active-tab   code | preview
//! codecanvas:theme        vs-dark | vs | hc-black | dracula
//! codecanvas:last-saved   2024-01-01T12:00:00Z
//! codecanvas:archive:*    purgeable when the quota is exhausted
//! ```
//!
//! Buffer contents are saved through a debounced autosave or an explicit
//! save. The selection keys are small and written as soon as they change.

mod debounce;
mod engine;
mod errors;
mod keys;
mod snapshot;
mod storage;

pub use debounce::{AutosaveTrigger, Debouncer, DEFAULT_AUTOSAVE_DELAY};
pub use engine::{PersistenceEngine, SaveStatus};
pub use errors::StorageError;
pub use keys::StorageKeys;
pub use snapshot::{Preferences, Snapshot, StoredBuffer};
pub use storage::{MemoryStorage, Storage};
