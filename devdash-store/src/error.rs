//! Error types for devdash-store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by store operations.
///
/// Load-time corruption is deliberately *not* represented here: a corrupt or
/// missing persisted document degrades to an empty initial state inside the
/// load protocol and never reaches callers. Mirror-write failures are logged
/// and swallowed — durability loss is degraded-but-continuable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON in an import source. The import is aborted and the
    /// canonical state is untouched.
    #[error("failed to parse import source {path}: {source}")]
    ImportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// State JSON serialization/deserialization error.
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
