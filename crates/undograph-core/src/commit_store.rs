#![forbid(unsafe_code)]

//! Id-keyed arena of commits.
//!
//! [`CommitStore`] owns every stored [`Commit`] and answers structural
//! questions about the parent chain. Commits refer to each other by
//! [`CommitId`] only, so every traversal is a sequence of key lookups and
//! entries can be erased at any time without invalidating anything.
//!
//! # Dangling parents
//!
//! After garbage collection a stored commit may name a parent that is no
//! longer stored. Every traversal treats a missing link as the end of the
//! chain; none of them report it as an error.
//!
//! ```text
//!   root ── a ── b ── c ── d        ancestor(d, 2) == b
//!                                   distance(d, a) == Some(3)
//!   (erased) ╌ b ── c ── d          ancestor(d, 3) == None
//!                                   distance(d, a) == Some(3)  (id reached)
//! ```
//!
//! # Termination
//!
//! A commit's parent always existed before the commit itself, and identities
//! are never reused, so parent chains cannot contain cycles and every walk
//! terminates.

use std::fmt;
use std::iter::FusedIterator;

use ahash::{AHashMap, AHashSet};

use crate::{Commit, CommitId};

/// Arena of commits keyed by identity.
pub struct CommitStore<D> {
    commits: AHashMap<CommitId, Commit<D>>,
}

impl<D> Default for CommitStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for CommitStore<D> {
    fn clone(&self) -> Self {
        Self {
            commits: self.commits.clone(),
        }
    }
}

impl<D> fmt::Debug for CommitStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitStore")
            .field("len", &self.commits.len())
            .finish()
    }
}

impl<D> CommitStore<D> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commits: AHashMap::new(),
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Insert a commit, replacing any commit with the same id.
    ///
    /// Returns the replaced commit, if any. Identities are freshly allocated
    /// per commit, so in practice nothing is ever replaced.
    pub fn insert(&mut self, commit: Commit<D>) -> Option<Commit<D>> {
        self.commits.insert(commit.id(), commit)
    }

    #[must_use]
    pub fn get(&self, id: CommitId) -> Option<&Commit<D>> {
        self.commits.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CommitId) -> bool {
        self.commits.contains_key(&id)
    }

    /// Remove a commit. Erasing a missing id is a no-op.
    pub fn erase(&mut self, id: CommitId) -> Option<Commit<D>> {
        self.commits.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Ids of all stored commits, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = CommitId> + '_ {
        self.commits.keys().copied()
    }

    /// All stored commits, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Commit<D>> + '_ {
        self.commits.values()
    }

    // ====================================================================
    // Traversal
    // ====================================================================

    /// Parent of the stored commit `id`.
    ///
    /// `None` if `id` is not stored or is a root commit. The returned parent
    /// may itself be absent from the store.
    #[must_use]
    pub fn parent_of(&self, id: CommitId) -> Option<CommitId> {
        self.get(id).and_then(Commit::parent)
    }

    /// Walk `id` and then its stored ancestors, nearest first.
    ///
    /// The walk ends at a root commit or at the first missing link.
    #[must_use]
    pub fn lineage(&self, id: CommitId) -> Lineage<'_, D> {
        Lineage {
            store: self,
            next: Some(id),
        }
    }

    /// The commit `n` parent links above `id`.
    ///
    /// `n == 0` returns the commit at `id` itself. Returns `None` as soon as
    /// any link along the way is missing.
    #[must_use]
    pub fn ancestor(&self, id: CommitId, n: usize) -> Option<&Commit<D>> {
        self.lineage(id).nth(n)
    }

    /// Number of parent hops from `from` up to `to`.
    ///
    /// `Some(0)` if they are equal. `None` if following parents from `from`
    /// never reaches `to`. `to` only has to be named by a link; it does not
    /// have to be stored.
    #[must_use]
    pub fn distance(&self, from: CommitId, to: CommitId) -> Option<usize> {
        let mut hops = 0;
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            if id == to {
                return Some(hops);
            }
            cursor = self.parent_of(id);
            hops += 1;
        }
        None
    }

    /// `true` if `candidate` is `of` or one of its stored ancestors.
    #[must_use]
    pub fn is_ancestor(&self, candidate: CommitId, of: CommitId) -> bool {
        self.lineage(of).any(|c| c.id() == candidate)
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Erase `start` and its ancestors, stopping before `end`.
    ///
    /// The walk also stops at a root commit or a missing link. With
    /// `end == None` everything from `start` down to the root goes. Returns
    /// the number of commits erased.
    pub fn erase_range(&mut self, start: CommitId, end: Option<CommitId>) -> usize {
        let mut erased = 0;
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if Some(id) == end {
                break;
            }
            let Some(commit) = self.commits.remove(&id) else {
                break;
            };
            cursor = commit.parent();
            erased += 1;
        }
        erased
    }

    /// Keep only the commits for which `keep` returns `true`.
    ///
    /// Returns the number of commits erased.
    pub fn retain(&mut self, mut keep: impl FnMut(&Commit<D>) -> bool) -> usize {
        let before = self.commits.len();
        self.commits.retain(|_, commit| keep(commit));
        before - self.commits.len()
    }

    /// Erase every commit that is neither `head` nor one of its ancestors.
    ///
    /// Collects the lineage of `head` once, so the cost is linear in the
    /// store size. Returns the number of commits erased.
    pub fn retain_lineage(&mut self, head: CommitId) -> usize {
        let live: AHashSet<CommitId> = self.lineage(head).map(Commit::id).collect();
        self.retain(|commit| live.contains(&commit.id()))
    }
}

/// Iterator over a commit and its stored ancestors.
///
/// Created by [`CommitStore::lineage`].
pub struct Lineage<'a, D> {
    store: &'a CommitStore<D>,
    next: Option<CommitId>,
}

impl<'a, D> Iterator for Lineage<'a, D> {
    type Item = &'a Commit<D>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let commit = self.store.get(id)?;
        self.next = commit.parent();
        Some(commit)
    }
}

impl<D> FusedIterator for Lineage<'_, D> {}
