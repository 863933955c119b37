#![forbid(unsafe_code)]

//! Garbage collection of the commit store.
//!
//! Runs after every commit. Three passes, in order:
//!
//! 1. **Max undo**: erase everything more than `max_undo` hops behind the
//!    current head.
//! 2. **Max redo**: if the branch head is more than `max_redo` hops ahead of
//!    the current head, pull it back and erase the commits in between.
//! 3. **Unreachable**: erase every commit that is neither the branch head
//!    nor one of its ancestors. This reclaims futures abandoned by
//!    committing while behind the branch head.
//!
//! ```text
//! before:  R ── A ── B ── C          current = B, branch = C
//! commit:  R ── A ── B ── C
//!                     └── D          current = branch = D
//! pass 3:  R ── A ── B ── D          C is unreachable from D
//! ```
//!
//! The passes are purely structural. A commit that survives one pass can
//! still be erased by a later one. No pass erases the current head or the
//! branch head.

use tracing::trace;
use undograph_core::{Commit, CommitId, CommitStore};

use crate::HistoryConfig;

/// Number of commits erased by each pass of one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcReport {
    pub max_undo: usize,
    pub max_redo: usize,
    pub unreachable: usize,
}

impl GcReport {
    /// Total commits erased by the run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.max_undo + self.max_redo + self.unreachable
    }
}

/// Run all three passes.
///
/// `branch_head` may be moved backwards by the max-redo pass. Both heads must
/// be stored on entry and are still stored on return.
pub fn collect<D>(
    store: &mut CommitStore<D>,
    current_head: CommitId,
    branch_head: &mut CommitId,
    config: &HistoryConfig,
) -> GcReport {
    debug_assert!(store.contains(current_head), "current head must be stored");
    debug_assert!(store.contains(*branch_head), "branch head must be stored");

    let report = GcReport {
        max_undo: prune_max_undo(store, current_head, config.max_undo),
        max_redo: prune_max_redo(store, current_head, branch_head, config.max_redo),
        unreachable: prune_unreachable(store, *branch_head),
    };

    debug_assert!(store.contains(current_head), "gc erased the current head");
    debug_assert!(store.contains(*branch_head), "gc erased the branch head");

    report
}

/// Erase the first commit past the undo window and everything behind it.
pub fn prune_max_undo<D>(
    store: &mut CommitStore<D>,
    current_head: CommitId,
    max_undo: usize,
) -> usize {
    let Some(cutoff) = store
        .ancestor(current_head, max_undo.saturating_add(1))
        .map(Commit::id)
    else {
        return 0;
    };

    let erased = store.erase_range(cutoff, None);
    trace!(
        cutoff = %cutoff,
        erased,
        max_undo,
        "gc: pruned history past undo window"
    );
    erased
}

/// Pull `branch_head` back to at most `max_redo` hops ahead of
/// `current_head`, erasing the commits it passes over.
pub fn prune_max_redo<D>(
    store: &mut CommitStore<D>,
    current_head: CommitId,
    branch_head: &mut CommitId,
    max_redo: usize,
) -> usize {
    let Some(redos) = store.distance(*branch_head, current_head) else {
        return 0;
    };

    let excess = redos.saturating_sub(max_redo);
    if excess == 0 {
        return 0;
    }

    let Some(new_branch_head) = store.ancestor(*branch_head, excess).map(Commit::id) else {
        return 0;
    };

    let erased = store.erase_range(*branch_head, Some(new_branch_head));
    trace!(
        old_branch_head = %*branch_head,
        new_branch_head = %new_branch_head,
        erased,
        max_redo,
        "gc: pruned redo history past redo window"
    );
    *branch_head = new_branch_head;
    erased
}

/// Erase every commit that is not on the lineage of `branch_head`.
pub fn prune_unreachable<D>(store: &mut CommitStore<D>, branch_head: CommitId) -> usize {
    let erased = store.retain_lineage(branch_head);
    if erased > 0 {
        trace!(
            branch_head = %branch_head,
            erased,
            "gc: pruned commits unreachable from branch head"
        );
    }
    erased
}
