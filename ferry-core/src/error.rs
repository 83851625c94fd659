//! Error types for ferry-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from definition store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load — includes the offending file path.
    #[error("failed to parse definition at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The definitions directory did not exist at the expected path.
    #[error("definitions directory not found at {path}")]
    DirNotFound { path: PathBuf },
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
