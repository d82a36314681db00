use std::io;

use crate::types::TargetId;

/// Errors that can occur while assembling schemes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Count arrays or per-scheme arrays disagree with each other.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A line file does not hold the number of lines the counts describe.
    #[error("Precondition error: {0}")]
    Precondition(String),

    #[error("{context} ({id}) not found in targets")]
    UnknownTarget { context: String, id: TargetId },

    #[error("{context} ({id}) is an app extension and requires `extension_host` to be set")]
    MissingExtensionHost { context: String, id: TargetId },

    #[error("{context} `extension_host` ({host}) does not host the extension ({id})")]
    InvalidExtensionHost {
        context: String,
        id: TargetId,
        host: TargetId,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn unknown_target(context: impl Into<String>, id: &TargetId) -> Self {
        Error::UnknownTarget {
            context: context.into(),
            id: id.clone(),
        }
    }
}

/// Result type alias for schemegen operations
pub type Result<T> = std::result::Result<T, Error>;
