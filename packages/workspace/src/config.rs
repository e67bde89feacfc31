use crate::ConfigError;
use codecanvas_composer::Placeholders;
use codecanvas_editor::EditorTheme;
use codecanvas_persistence::{StorageKeys, DEFAULT_AUTOSAVE_DELAY};
use codecanvas_preview::{SandboxPolicy, DEFAULT_LOADING_FLOOR};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playground settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Quiet period after the last edit before saving
    pub autosave_delay_ms: u64,

    /// Minimum time the preview shows as loading
    pub loading_floor_ms: u64,

    pub storage: StorageKeys,
    pub placeholders: Placeholders,
    pub sandbox: SandboxPolicy,

    /// Theme used when none was saved
    pub default_theme: EditorTheme,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
            loading_floor_ms: DEFAULT_LOADING_FLOOR.as_millis() as u64,
            storage: StorageKeys::default(),
            placeholders: Placeholders::default(),
            sandbox: SandboxPolicy::default(),
            default_theme: EditorTheme::default(),
        }
    }
}

impl PlaygroundConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlaygroundConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sandbox.validate()?;
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn loading_floor(&self) -> Duration {
        Duration::from_millis(self.loading_floor_ms)
    }
}
