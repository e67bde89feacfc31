//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Unknown buffer: {0}")]
    UnknownBuffer(String),

    #[error("Duplicate buffer name: {0}")]
    DuplicateBuffer(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown view tab: {0}")]
    UnknownTab(String),

    #[error("Unknown editor theme: {0}")]
    UnknownTheme(String),
}
