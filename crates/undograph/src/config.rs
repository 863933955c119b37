#![forbid(unsafe_code)]

//! History bounds and document naming, loadable as data.
//!
//! ```toml
//! # undograph.toml
//! max_undo = 64
//! max_redo = 16
//! untitled_name = "untitled.model"
//! ```
//!
//! ```rust,ignore
//! let config = HistoryConfig::from_toml_file("undograph.toml")?.into_validated()?;
//! let doc = VersionedDocument::with_config(model, config);
//! ```
//!
//! Missing fields take their defaults, so an empty file yields
//! [`HistoryConfig::default`].

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, HistoryResult};

/// Maximum number of undo steps kept behind the current checkout.
pub const DEFAULT_MAX_UNDO: usize = 32;

/// Maximum number of redo steps kept ahead of the current checkout.
pub const DEFAULT_MAX_REDO: usize = 32;

/// Name suggested for a document that has no filesystem location.
pub const DEFAULT_UNTITLED_NAME: &str = "untitled";

/// Configuration for a [`VersionedDocument`](crate::VersionedDocument).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HistoryConfig {
    /// Commits kept behind the current head. Older ones are collected.
    pub max_undo: usize,
    /// Commits kept ahead of the current head.
    pub max_redo: usize,
    /// Suggested file name for documents that were never saved.
    pub untitled_name: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
            max_redo: DEFAULT_MAX_REDO,
            untitled_name: DEFAULT_UNTITLED_NAME.to_owned(),
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with the given bounds.
    #[must_use]
    pub fn new(max_undo: usize, max_redo: usize) -> Self {
        Self {
            max_undo,
            max_redo,
            ..Self::default()
        }
    }

    /// Create an unbounded configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX, usize::MAX)
    }

    #[must_use]
    pub fn with_max_undo(mut self, max_undo: usize) -> Self {
        self.max_undo = max_undo;
        self
    }

    #[must_use]
    pub fn with_max_redo(mut self, max_redo: usize) -> Self {
        self.max_redo = max_redo;
        self
    }

    #[must_use]
    pub fn with_untitled_name(mut self, name: impl Into<String>) -> Self {
        self.untitled_name = name.into();
        self
    }

    /// Upper bound on the number of commits a store can hold after garbage
    /// collection: the head, its undo window, and its redo window.
    #[must_use]
    pub fn max_stored_commits(&self) -> usize {
        self.max_undo.saturating_add(self.max_redo).saturating_add(1)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.untitled_name.trim().is_empty() {
            errors.push("untitled_name must not be empty".into());
        }

        if self.untitled_name.contains(['/', '\\']) {
            errors.push(format!(
                "untitled_name must be a bare file name, got {:?}",
                self.untitled_name
            ));
        }

        errors
    }

    /// Return `self` if it validates, or every validation error at once.
    pub fn into_validated(self) -> HistoryResult<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(HistoryError::InvalidConfig(errors))
        }
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> HistoryResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> HistoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HistoryError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> HistoryResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> HistoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HistoryError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Load from a file, picking the format by extension (`.json` or TOML).
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>) -> HistoryResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = HistoryConfig::default();
        assert_eq!(config.max_undo, DEFAULT_MAX_UNDO);
        assert_eq!(config.max_redo, DEFAULT_MAX_REDO);
        assert_eq!(config.untitled_name, DEFAULT_UNTITLED_NAME);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn max_stored_commits_counts_head() {
        assert_eq!(HistoryConfig::new(3, 2).max_stored_commits(), 6);
        assert_eq!(HistoryConfig::new(0, 0).max_stored_commits(), 1);
    }

    #[test]
    fn unlimited_does_not_overflow() {
        assert_eq!(HistoryConfig::unlimited().max_stored_commits(), usize::MAX);
    }

    #[test]
    fn builder_setters() {
        let config = HistoryConfig::default()
            .with_max_undo(4)
            .with_max_redo(5)
            .with_untitled_name("scratch.model");
        assert_eq!(config.max_undo, 4);
        assert_eq!(config.max_redo, 5);
        assert_eq!(config.untitled_name, "scratch.model");
    }

    #[test]
    fn empty_untitled_name_is_rejected() {
        let config = HistoryConfig::default().with_untitled_name("  ");
        assert_eq!(config.validate().len(), 1);
        assert!(matches!(
            config.into_validated(),
            Err(HistoryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn untitled_name_with_separator_is_rejected() {
        let config = HistoryConfig::default().with_untitled_name("dir/untitled");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("bare file name"));
    }

    #[cfg(feature = "config")]
    mod loading {
        use super::*;

        #[test]
        fn toml_partial_fills_defaults() {
            let config = HistoryConfig::from_toml_str("max_undo = 8\n").unwrap();
            assert_eq!(config.max_undo, 8);
            assert_eq!(config.max_redo, DEFAULT_MAX_REDO);
            assert_eq!(config.untitled_name, DEFAULT_UNTITLED_NAME);
        }

        #[test]
        fn empty_toml_is_default() {
            let config = HistoryConfig::from_toml_str("").unwrap();
            assert_eq!(config, HistoryConfig::default());
        }

        #[test]
        fn json_roundtrip() {
            let config = HistoryConfig::new(5, 6).with_untitled_name("u.model");
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(HistoryConfig::from_json_str(&json).unwrap(), config);
        }

        #[test]
        fn malformed_toml_is_an_error() {
            let err = HistoryConfig::from_toml_str("max_undo = \"lots\"").unwrap_err();
            assert!(matches!(err, HistoryError::Toml(_)));
        }

        #[test]
        fn malformed_json_is_an_error() {
            let err = HistoryConfig::from_json_str("{ not json").unwrap_err();
            assert!(matches!(err, HistoryError::Json(_)));
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = HistoryConfig::from_toml_file("/nonexistent/undograph.toml").unwrap_err();
            assert!(matches!(err, HistoryError::Io { .. }));
        }

        #[test]
        fn from_file_dispatches_on_extension() {
            let dir = tempfile::tempdir().unwrap();
            let json = dir.path().join("history.json");
            std::fs::write(&json, r#"{ "max_redo": 3 }"#).unwrap();
            let toml = dir.path().join("history.toml");
            std::fs::write(&toml, "max_redo = 4\n").unwrap();

            assert_eq!(HistoryConfig::from_file(&json).unwrap().max_redo, 3);
            assert_eq!(HistoryConfig::from_file(&toml).unwrap().max_redo, 4);
        }
    }
}
