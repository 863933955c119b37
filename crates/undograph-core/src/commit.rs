#![forbid(unsafe_code)]

//! Immutable commit records.
//!
//! A [`Commit`] pairs a snapshot of the document with its identity, its
//! parent link, a human-readable message, and the wall-clock time at which it
//! was created. Once built, a commit never changes.
//!
//! The snapshot lives behind an [`Arc`], so cloning a commit (for example to
//! hand the latest commit to a UI panel) never copies the document. The
//! snapshot is still an independent copy of the live document: it was cloned
//! out of the working copy when the commit was made, and nothing hands out
//! mutable access to it afterwards.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::CommitId;

/// An immutable, identified snapshot of a document.
///
/// Equality and hashing use the identity only: two commits are equal iff
/// one is a clone of the other.
pub struct Commit<D> {
    id: CommitId,
    parent: Option<CommitId>,
    message: String,
    created_at: DateTime<Utc>,
    snapshot: Arc<D>,
}

impl<D> Commit<D> {
    /// Create a commit holding `snapshot`, with a freshly allocated id.
    #[must_use]
    pub fn new(parent: Option<CommitId>, message: impl Into<String>, snapshot: D) -> Self {
        Self::from_arc(parent, message, Arc::new(snapshot))
    }

    /// Create a commit around an already shared snapshot.
    #[must_use]
    pub fn from_arc(
        parent: Option<CommitId>,
        message: impl Into<String>,
        snapshot: Arc<D>,
    ) -> Self {
        Self {
            id: CommitId::fresh(),
            parent,
            message: message.into(),
            created_at: Utc::now(),
            snapshot,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> CommitId {
        self.id
    }

    /// Parent commit, or `None` for a root commit.
    ///
    /// The parent may no longer be stored if it was garbage collected.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<CommitId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When this commit was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The document as it was when this commit was made.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &D {
        &self.snapshot
    }

    /// The shared handle to the snapshot.
    #[inline]
    #[must_use]
    pub fn snapshot_arc(&self) -> &Arc<D> {
        &self.snapshot
    }
}

impl<D> Clone for Commit<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            parent: self.parent,
            message: self.message.clone(),
            created_at: self.created_at,
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<D> fmt::Debug for Commit<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("message", &self.message)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl<D> PartialEq for Commit<D> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<D> Eq for Commit<D> {}

impl<D> Hash for Commit<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
