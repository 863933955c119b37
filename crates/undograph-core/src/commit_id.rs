#![forbid(unsafe_code)]

//! Process-unique identities.
//!
//! Both [`CommitId`] and [`DocumentVersion`] draw from one process-wide
//! counter, so no two identities created in the same process are ever equal.
//! Values are compared, hashed, and printed; they are never interpreted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next raw identity value. Zero is never handed out.
static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> u64 {
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a single commit.
///
/// There is no `Default` and no empty value: "no commit" is spelled
/// `Option<CommitId>::None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitId(u64);

impl CommitId {
    /// Allocate a fresh identity that has never been returned before.
    #[must_use]
    pub fn fresh() -> Self {
        Self(next_uid())
    }

    /// Returns the underlying value.
    ///
    /// For logging and debugging only.
    #[inline]
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit#{}", self.0)
    }
}

/// Version marker of a mutable document.
///
/// Regenerated whenever the document is mutated in place so that renderers
/// and other caches can tell that their derived data is stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentVersion(u64);

impl DocumentVersion {
    /// Allocate a fresh version marker.
    #[must_use]
    pub fn fresh() -> Self {
        Self(next_uid())
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for DocumentVersion {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_ids_are_distinct() {
        let ids: HashSet<_> = (0..1000).map(|_| CommitId::fresh()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn fresh_ids_increase() {
        let a = CommitId::fresh();
        let b = CommitId::fresh();
        assert!(b > a);
    }

    #[test]
    fn commit_ids_and_versions_never_collide() {
        let c = CommitId::fresh();
        let v = DocumentVersion::fresh();
        assert_ne!(c.value(), v.value());
    }

    #[test]
    fn default_version_is_fresh() {
        assert_ne!(DocumentVersion::default(), DocumentVersion::default());
    }

    #[test]
    fn display_includes_value() {
        let id = CommitId::fresh();
        assert_eq!(id.to_string(), format!("commit#{}", id.value()));
    }
}
