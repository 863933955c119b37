#![forbid(unsafe_code)]

//! Bookkeeping that links a document to a file on disk.
//!
//! The commit graph does not read or write document files. It only records
//! where the document lives, when that file was last written, and which
//! commit was checked out at that moment, so callers can answer "are there
//! unsaved changes?" and "did the file change behind our back?".

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use undograph_core::CommitId;

use crate::error::{HistoryError, HistoryResult};

/// Filesystem association of a versioned document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskState {
    path: Option<PathBuf>,
    last_write_time: Option<DateTime<Utc>>,
    saved_commit: Option<CommitId>,
}

impl DiskState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a document that lives at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Modification time of the file when it was last saved or loaded.
    #[must_use]
    pub fn last_write_time(&self) -> Option<DateTime<Utc>> {
        self.last_write_time
    }

    /// Commit that was checked out when the file was last saved or loaded.
    #[must_use]
    pub fn saved_commit(&self) -> Option<CommitId> {
        self.saved_commit
    }

    /// Record that `commit` now matches the file written at `written_at`.
    pub fn mark_saved(&mut self, commit: CommitId, written_at: DateTime<Utc>) {
        self.saved_commit = Some(commit);
        self.last_write_time = Some(written_at);
    }

    /// `true` if `commit` is the one recorded as saved.
    #[must_use]
    pub fn is_saved_at(&self, commit: CommitId) -> bool {
        self.saved_commit == Some(commit)
    }

    /// File name of the path, or `untitled` if there is no usable path.
    #[must_use]
    pub fn recommended_name(&self, untitled: &str) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| untitled.to_owned(), |n| n.to_string_lossy().into_owned())
    }
}

/// Read the modification time of the file at `path`.
pub fn modification_time(path: &Path) -> HistoryResult<DateTime<Utc>> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| HistoryError::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_no_location() {
        let disk = DiskState::new();
        assert!(disk.path().is_none());
        assert!(disk.last_write_time().is_none());
        assert!(disk.saved_commit().is_none());
    }

    #[test]
    fn recommended_name_prefers_file_name() {
        let disk = DiskState::at("/models/arm26.model");
        assert_eq!(disk.recommended_name("untitled"), "arm26.model");
    }

    #[test]
    fn recommended_name_falls_back_to_untitled() {
        assert_eq!(DiskState::new().recommended_name("untitled"), "untitled");
        assert_eq!(DiskState::at("/").recommended_name("fallback"), "fallback");
    }

    #[test]
    fn mark_saved_records_commit_and_time() {
        let mut disk = DiskState::new();
        let commit = CommitId::fresh();
        let now = Utc::now();
        disk.mark_saved(commit, now);
        assert!(disk.is_saved_at(commit));
        assert!(!disk.is_saved_at(CommitId::fresh()));
        assert_eq!(disk.last_write_time(), Some(now));
    }

    #[test]
    fn modification_time_of_real_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(modification_time(file.path()).is_ok());
    }

    #[test]
    fn modification_time_of_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.model");
        let err = modification_time(&missing).unwrap_err();
        assert!(matches!(err, HistoryError::Io { ref path, .. } if path == &missing));
    }
}
