//! Error taxonomy shared by the fetch, report, import and archive layers.

use crate::config::ConfigError;

/// Errors surfaced by archive and import operations.
///
/// A duplicate playlist during import is not an error; it is reported through
/// [`crate::import::ImportStatus::DuplicateSkip`].
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The remote service or the local archive has no such entity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A field the upstream contract guarantees was missing or out of range.
    #[error("Malformed record: missing or invalid `{field}` ({context})")]
    MalformedRecord { field: String, context: String },

    /// Transport, authorization or rate limit failure from a remote call.
    #[error("Remote call failed: {0}")]
    RemoteCallFailure(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ArchiveError {
    pub fn malformed(field: impl Into<String>, context: impl Into<String>) -> Self {
        ArchiveError::MalformedRecord {
            field: field.into(),
            context: context.into(),
        }
    }
}

impl From<reqwest::Error> for ArchiveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ArchiveError::malformed("response body", err.to_string())
        } else {
            ArchiveError::RemoteCallFailure(err.to_string())
        }
    }
}
