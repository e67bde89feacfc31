use serde::{Deserialize, Serialize};

/// Names of the durable storage entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Buffer contents: name → {language, value}
    pub files: String,
    pub active_file: String,
    pub active_tab: String,
    pub theme: String,
    /// ISO-8601 timestamp of the last successful save
    pub last_saved: String,

    /// Entries under this prefix may be purged to free space
    pub archive_prefix: String,

    /// Keys left behind by older versions, also purgeable
    pub legacy_keys: Vec<String>,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            files: "codecanvas:files".to_string(),
            active_file: "codecanvas:active-file".to_string(),
            active_tab: "codecanvas:active-tab".to_string(),
            theme: "codecanvas:theme".to_string(),
            last_saved: "codecanvas:last-saved".to_string(),
            archive_prefix: "codecanvas:archive:".to_string(),
            legacy_keys: Vec::new(),
        }
    }
}

impl StorageKeys {
    /// Keys holding current state
    pub fn is_live(&self, key: &str) -> bool {
        [
            &self.files,
            &self.active_file,
            &self.active_tab,
            &self.theme,
            &self.last_saved,
        ]
        .into_iter()
        .any(|k| k == key)
    }

    /// Whether `key` may be deleted during quota recovery. Live keys never are.
    pub fn is_purgeable(&self, key: &str) -> bool {
        if self.is_live(key) {
            return false;
        }

        (!self.archive_prefix.is_empty() && key.starts_with(&self.archive_prefix))
            || self.legacy_keys.iter().any(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purgeable_keys() {
        let keys = StorageKeys {
            legacy_keys: vec!["playground-files".to_string()],
            ..StorageKeys::default()
        };

        assert!(keys.is_purgeable("codecanvas:archive:2023-01-01"));
        assert!(keys.is_purgeable("playground-files"));
        assert!(!keys.is_purgeable("codecanvas:files"));
        assert!(!keys.is_purgeable("unrelated"));
    }

    #[test]
    fn test_live_keys_survive_broad_prefix() {
        let keys = StorageKeys {
            archive_prefix: "codecanvas:".to_string(),
            ..StorageKeys::default()
        };

        assert!(!keys.is_purgeable("codecanvas:theme"));
        assert!(keys.is_purgeable("codecanvas:old"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let keys: StorageKeys = serde_json::from_str(r#"{"files": "custom"}"#).unwrap();
        assert_eq!(keys.files, "custom");
        assert_eq!(keys.theme, "codecanvas:theme");
    }
}
