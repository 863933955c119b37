#![forbid(unsafe_code)]

//! Errors surfaced by undograph.
//!
//! The commit graph itself has no failure modes: impossible undo/redo
//! requests are no-ops and foreign checkouts return `false`. Errors only come
//! from the edges of the system, i.e. reading configuration and querying the
//! filesystem for a document's modification time.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration loading and filesystem bookkeeping.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Reading a file or its metadata failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("failed to parse TOML history config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("failed to parse JSON history config: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but failed validation.
    #[error("invalid history config: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for fallible undograph operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_error_names_path_and_keeps_source() {
        let err = HistoryError::io(
            "/tmp/missing.doc",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.doc"));
        assert!(msg.contains("no such file"));
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_config_joins_messages() {
        let err = HistoryError::InvalidConfig(vec!["a is bad".into(), "b is bad".into()]);
        assert_eq!(err.to_string(), "invalid history config: a is bad; b is bad");
    }
}
