//! Persisted form of the playground state

use chrono::{DateTime, Utc};
use codecanvas_editor::{Buffer, Buffers, EditorTheme, Language, ViewTab};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Stored language and text of one buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBuffer {
    pub language: Language,
    pub value: String,
}

/// Selection state written independently of buffer contents.
/// `None` means nothing usable was stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub active_buffer: Option<String>,
    pub active_tab: Option<ViewTab>,
    pub theme: Option<EditorTheme>,
}

/// Everything a save writes and a restore reads back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub buffers: BTreeMap<String, StoredBuffer>,
    pub active_buffer: String,
    pub active_tab: ViewTab,
    pub theme: EditorTheme,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Capture the current state for saving
    pub fn capture(
        buffers: &Buffers,
        active_buffer: &str,
        active_tab: ViewTab,
        theme: EditorTheme,
    ) -> Self {
        Self {
            buffers: buffers
                .iter()
                .map(|b| {
                    (
                        b.name.clone(),
                        StoredBuffer {
                            language: b.language,
                            value: b.value.clone(),
                        },
                    )
                })
                .collect(),
            active_buffer: active_buffer.to_string(),
            active_tab,
            theme,
            saved_at: None,
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            active_buffer: Some(self.active_buffer.clone()),
            active_tab: Some(self.active_tab),
            theme: Some(self.theme),
        }
    }

    /// Overlay stored values onto `template`.
    ///
    /// The template decides which buffers exist and their languages.
    /// Stored buffers the template does not know are dropped.
    pub fn apply_to(&self, template: &Buffers) -> Buffers {
        for name in self.buffers.keys() {
            if !template.contains(name) {
                warn!(buffer = %name, "Dropping stored buffer outside the fixed set");
            }
        }

        let items: Vec<Buffer> = template
            .iter()
            .map(|b| {
                let value = self
                    .buffers
                    .get(&b.name)
                    .map(|stored| stored.value.clone())
                    .unwrap_or_else(|| b.value.clone());
                Buffer::new(b.name.clone(), b.language, value)
            })
            .collect();

        Buffers::new(items).unwrap_or_else(|_| template.clone())
    }

    /// Serialized buffer map for the main storage key
    pub(crate) fn files_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.buffers)
    }

    pub(crate) fn files_from_json(
        json: &str,
    ) -> Result<BTreeMap<String, StoredBuffer>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
