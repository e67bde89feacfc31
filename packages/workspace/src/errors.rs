//! Error types for the playground

use codecanvas_editor::EditorError;
use codecanvas_preview::PreviewError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid sandbox policy: {0}")]
    Sandbox(#[from] PreviewError),

    #[error("Invalid key chord: {0:?}")]
    KeyChord(String),
}

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Playground has been torn down")]
    TornDown,
}
