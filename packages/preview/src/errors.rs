//! Error types for the preview bridge

use crate::SandboxCapability;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    #[error("Execution context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Capability {0} cannot be granted to the preview")]
    ForbiddenCapability(SandboxCapability),

    #[error("No document has been composed yet")]
    NothingToRender,

    #[error("External window could not be opened: {0}")]
    ExternalView(String),
}
