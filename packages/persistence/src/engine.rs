//! # Persistence Engine
//!
//! Save procedure:
//!
//! ```text
//! save_now ─▶ Saving ─▶ write files ──ok──────────────────────────▶ Saved
//!                           │
//!                           └─err─▶ purge stale keys ─▶ retry ──ok─▶ Saved
//!                                                          └─err─▶ Error
//! ```
//!
//! A failed save never touches in-memory state; the next save simply
//! tries again with whatever the buffers hold then.

use crate::{Debouncer, Preferences, Snapshot, Storage, StorageError, StorageKeys};
use chrono::{DateTime, Utc};
use codecanvas_common::SharedClock;
use codecanvas_editor::{EditorTheme, ViewTab};
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Observable outcome of the most recent save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Error => "error",
        }
    }
}

pub struct PersistenceEngine<S> {
    storage: S,
    keys: StorageKeys,
    clock: SharedClock,
    debouncer: Debouncer,
    status: Option<SaveStatus>,

    /// Status transitions not yet collected by the host
    transitions: Vec<SaveStatus>,

    last_saved: Option<DateTime<Utc>>,

    /// Set while the most recent save failed
    save_failed: bool,
}

impl<S: Storage> PersistenceEngine<S> {
    pub fn new(
        storage: S,
        keys: StorageKeys,
        clock: SharedClock,
        autosave_delay: Duration,
    ) -> Self {
        let debouncer = Debouncer::new(clock.clone(), autosave_delay);

        Self {
            storage,
            keys,
            clock,
            debouncer,
            status: None,
            transitions: Vec::new(),
            last_saved: None,
            save_failed: false,
        }
    }

    /// Handle onto the autosave timer, for registering an
    /// [`AutosaveTrigger`](crate::AutosaveTrigger) on the buffer store
    pub fn debouncer(&self) -> Debouncer {
        self.debouncer.clone()
    }

    /// Re-arm the autosave timer
    pub fn schedule_autosave(&self) {
        self.debouncer.arm();
    }

    /// Whether a scheduled autosave is due now. Consumes the deadline.
    pub fn autosave_due(&mut self) -> bool {
        self.debouncer.fire_if_due().is_some()
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// Drop any pending autosave
    pub fn cancel_autosave(&self) {
        if let Some(id) = self.debouncer.cancel() {
            debug!(?id, "Pending autosave cancelled");
        }
    }

    /// Cancel any pending autosave and write `snapshot` immediately
    pub fn save_now(&mut self, snapshot: &Snapshot) -> Result<DateTime<Utc>, StorageError> {
        self.cancel_autosave();
        self.set_status(SaveStatus::Saving);

        match self.write_snapshot(snapshot) {
            Ok(saved_at) => {
                self.last_saved = Some(saved_at);
                self.save_failed = false;
                self.set_status(SaveStatus::Saved);
                info!(buffers = snapshot.buffers.len(), saved_at = %saved_at, "Saved");
                Ok(saved_at)
            }
            Err(e) => {
                self.save_failed = true;
                self.set_status(SaveStatus::Error);
                error!(error = %e, "Save failed, changes remain in memory only");
                Err(e)
            }
        }
    }

    /// Whether in-memory state may differ from storage: an autosave is
    /// pending or the last save failed
    pub fn has_unsaved_changes(&self) -> bool {
        self.debouncer.is_armed() || self.save_failed
    }

    /// Save only if there are unsaved changes. Used on teardown.
    pub fn flush(&mut self, snapshot: &Snapshot) -> Option<Result<DateTime<Utc>, StorageError>> {
        if !self.has_unsaved_changes() {
            return None;
        }
        Some(self.save_now(snapshot))
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<DateTime<Utc>, StorageError> {
        let payload = snapshot.files_json()?;
        let files_key = self.keys.files.clone();

        if let Err(first) = self.storage.set(&files_key, &payload) {
            warn!(error = %first, "Write failed, purging stale entries before retrying");
            let purged = self.purge_stale();
            info!(purged, "Stale entries purged");
            self.storage.set(&files_key, &payload)?;
        }

        self.write_preferences(&snapshot.preferences());

        let saved_at = self.clock.now();
        let last_saved_key = self.keys.last_saved.clone();
        let _ = self.write_secondary(&last_saved_key, &saved_at.to_rfc3339());
        Ok(saved_at)
    }

    /// Remove archived and legacy entries. Returns how many were removed.
    pub fn purge_stale(&mut self) -> usize {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Could not list storage keys");
                return 0;
            }
        };

        let mut purged = 0;
        for key in keys.iter().filter(|k| self.keys.is_purgeable(k)) {
            match self.storage.remove(key) {
                Ok(()) => {
                    debug!(key = %key, "Purged");
                    purged += 1;
                }
                Err(e) => warn!(key = %key, error = %e, "Could not purge entry"),
            }
        }
        purged
    }

    /// Read the last saved state. Any failure means "nothing to restore".
    pub fn restore(&self) -> Option<Snapshot> {
        let raw = match self.storage.get(&self.keys.files) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved buffers, starting from the default template");
                return None;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Could not read saved buffers, starting from the default template"
                );
                return None;
            }
        };

        let buffers = match Snapshot::files_from_json(&raw) {
            Ok(buffers) => buffers,
            Err(e) => {
                warn!(error = %e, "Saved buffers are corrupt, starting from the default template");
                return None;
            }
        };

        let preferences = self.restore_preferences();
        let active_buffer = preferences
            .active_buffer
            .unwrap_or_else(|| codecanvas_editor::DEFAULT_ACTIVE_BUFFER.to_string());

        Some(Snapshot {
            buffers,
            active_buffer,
            active_tab: preferences.active_tab.unwrap_or_default(),
            theme: preferences.theme.unwrap_or_default(),
            saved_at: self.read_last_saved(),
        })
    }

    /// Read the selection keys. Missing or invalid entries come back as `None`.
    pub fn restore_preferences(&self) -> Preferences {
        Preferences {
            active_buffer: self.read(&self.keys.active_file),
            active_tab: self.read_parsed::<ViewTab>(&self.keys.active_tab),
            theme: self.read_parsed::<EditorTheme>(&self.keys.theme),
        }
    }

    pub fn persist_active_buffer(&mut self, name: &str) -> Result<(), StorageError> {
        let key = self.keys.active_file.clone();
        self.write_secondary(&key, name)
    }

    pub fn persist_active_tab(&mut self, tab: ViewTab) -> Result<(), StorageError> {
        let key = self.keys.active_tab.clone();
        self.write_secondary(&key, tab.as_str())
    }

    pub fn persist_theme(&mut self, theme: EditorTheme) -> Result<(), StorageError> {
        let key = self.keys.theme.clone();
        self.write_secondary(&key, theme.as_str())
    }

    fn write_preferences(&mut self, preferences: &Preferences) {
        if let Some(name) = &preferences.active_buffer {
            let _ = self.persist_active_buffer(name);
        }
        if let Some(tab) = preferences.active_tab {
            let _ = self.persist_active_tab(tab);
        }
        if let Some(theme) = preferences.theme {
            let _ = self.persist_theme(theme);
        }
    }

    fn write_secondary(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set(key, value).map_err(|e| {
            warn!(key = %key, error = %e, "Could not persist setting");
            e
        })
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read setting");
                None
            }
        }
    }

    fn read_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        let parsed = raw.parse().ok();
        if parsed.is_none() {
            warn!(key = %key, value = %raw, "Ignoring unrecognised setting");
        }
        parsed
    }

    fn read_last_saved(&self) -> Option<DateTime<Utc>> {
        let raw = self.read(&self.keys.last_saved)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    }

    fn set_status(&mut self, status: SaveStatus) {
        self.status = Some(status);
        self.transitions.push(status);
    }

    /// Status of the latest save, `None` before the first one
    pub fn status(&self) -> Option<SaveStatus> {
        self.status
    }

    /// Take status transitions recorded since the last call
    pub fn drain_status_changes(&mut self) -> Vec<SaveStatus> {
        std::mem::take(&mut self.transitions)
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
