#![forbid(unsafe_code)]

//! The versioned document: a scratch copy backed by a commit graph.
//!
//! [`VersionedDocument`] owns one mutable [`Scratch`] that the application
//! edits freely, and a [`CommitStore`] of immutable snapshots linked by
//! parent pointers. Two heads track where the scratch came from:
//!
//! - `current_head`: the commit the scratch was most recently derived from.
//!   New commits are parented here.
//! - `branch_head`: the most advanced commit reachable by redo. Always equal
//!   to `current_head` or a descendant of it.
//!
//! ```text
//! R ── A ── B ── C
//!      ^         ^
//!      current   branch        undo() moves current left, redo() right
//!
//! R ── A ── D                  commit() from A: both heads move to D and
//!                              B, C become unreachable and are collected
//! ```
//!
//! # Invariants
//!
//! 1. `current_head` and `branch_head` are always stored.
//! 2. `current_head` is `branch_head` or one of its ancestors.
//! 3. After any commit, `store.len() <= config.max_stored_commits()`.
//! 4. Undo, redo, checkout, and rollback only move pointers and rebuild the
//!    scratch; only garbage collection erases commits.
//!
//! # Sticky state
//!
//! Whenever the scratch is rebuilt from a commit, a fresh scratch is built
//! from the commit's snapshot and the sticky UI state (selection, hover,
//! fixup scale factor) is copied over from the outgoing scratch. Uncommitted
//! document edits are never carried across. Rollback is an emergency reset
//! and only carries the scale factor.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, debug_span, info, trace, warn};
use undograph_core::{Commit, CommitId, CommitStore, DocumentVersion};

use crate::HistoryConfig;
use crate::disk::{self, DiskState};
use crate::error::HistoryResult;
use crate::gc::{self, GcReport};
use crate::scratch::{ComponentPath, Scratch};

/// Message of the bootstrap commit of a brand new document.
pub const NEW_DOCUMENT_MESSAGE: &str = "created a new document";

/// How much sticky state survives a scratch rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Carry {
    /// Selection, hover, and scale factor.
    Sticky,
    /// Scale factor only.
    ScaleOnly,
}

/// An editable document with snapshot-based undo/redo history.
#[derive(Clone)]
pub struct VersionedDocument<D> {
    /// Mutable staging area that callers edit.
    scratch: Scratch<D>,
    /// Where the next commit is parented.
    current_head: CommitId,
    /// Most advanced commit reachable by redo.
    branch_head: CommitId,
    store: CommitStore<D>,
    config: HistoryConfig,
    disk: DiskState,
    last_gc: GcReport,
}

impl<D> fmt::Debug for VersionedDocument<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedDocument")
            .field("current_head", &self.current_head)
            .field("branch_head", &self.branch_head)
            .field("commits", &self.store.len())
            .field("config", &self.config)
            .field("disk", &self.disk)
            .finish_non_exhaustive()
    }
}

impl<D: Clone> VersionedDocument<D> {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Start versioning `document` with the default configuration.
    #[must_use]
    pub fn new(document: D) -> Self {
        Self::with_message(document, NEW_DOCUMENT_MESSAGE)
    }

    /// Start versioning `document`, labelling the initial commit `message`.
    #[must_use]
    pub fn with_message(document: D, message: impl Into<String>) -> Self {
        Self::bootstrap(document, HistoryConfig::default(), message.into(), DiskState::new())
    }

    /// Start versioning `document` with custom history bounds.
    #[must_use]
    pub fn with_config(document: D, config: HistoryConfig) -> Self {
        Self::bootstrap(document, config, NEW_DOCUMENT_MESSAGE.to_owned(), DiskState::new())
    }

    /// Start versioning a document that was just loaded from `path`.
    ///
    /// The caller parses the file; this records the location, labels the
    /// initial commit after the file name, and marks the document as up to
    /// date with the file's current modification time.
    pub fn open(document: D, path: impl Into<PathBuf>) -> HistoryResult<Self> {
        Self::open_with_config(document, path, HistoryConfig::default())
    }

    /// [`open`](Self::open) with custom history bounds.
    pub fn open_with_config(
        document: D,
        path: impl Into<PathBuf>,
        config: HistoryConfig,
    ) -> HistoryResult<Self> {
        let path = path.into();
        let written_at = disk::modification_time(&path)?;
        let message = match path.file_name() {
            Some(name) => format!("loaded {}", name.to_string_lossy()),
            None => "loaded document".to_owned(),
        };

        let mut doc = Self::bootstrap(document, config, message, DiskState::at(&path));
        doc.disk.mark_saved(doc.current_head, written_at);
        info!(
            path = %path.display(),
            commit = %doc.current_head,
            "opened versioned document"
        );
        Ok(doc)
    }

    fn bootstrap(document: D, config: HistoryConfig, message: String, disk: DiskState) -> Self {
        let scratch = Scratch::new(document);
        let root = Commit::new(None, message, scratch.document().clone());
        let root_id = root.id();
        debug!(commit = %root_id, message = root.message(), "bootstrapped commit graph");

        let mut store = CommitStore::new();
        store.insert(root);

        Self {
            scratch,
            current_head: root_id,
            branch_head: root_id,
            store,
            config,
            disk,
            last_gc: GcReport::default(),
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Snapshot the scratch into a new commit parented at the current head.
    ///
    /// Both heads move to the new commit, discarding any redo history ahead
    /// of the old current head, and the store is garbage collected.
    pub fn commit(&mut self, message: impl Into<String>) -> CommitId {
        let message = message.into();
        let _span = debug_span!("commit", message = %message).entered();

        let commit = Commit::new(
            Some(self.current_head),
            message,
            self.scratch.document().clone(),
        );
        let id = commit.id();
        debug!(
            commit = %id,
            parent = %self.current_head,
            message = commit.message(),
            "committed scratch"
        );

        self.store.insert(commit);
        self.current_head = id;
        self.branch_head = id;
        self.garbage_collect();
        id
    }

    /// Step back to the parent of the current head. No-op if there is none.
    ///
    /// The branch head does not move, so the step can be redone.
    pub fn undo(&mut self) {
        let Some(parent) = self
            .store
            .parent_of(self.current_head)
            .filter(|p| self.store.contains(*p))
        else {
            trace!(commit = %self.current_head, "undo: nothing to undo");
            return;
        };

        debug!(from = %self.current_head, to = %parent, "undo");
        self.move_current_head(parent, Carry::Sticky);
    }

    /// Step forward towards the branch head. No-op if already there.
    pub fn redo(&mut self) {
        let Some(redos) = self.redo_distance() else {
            trace!(commit = %self.current_head, "redo: nothing to redo");
            return;
        };

        let Some(target) = self
            .store
            .ancestor(self.branch_head, redos - 1)
            .map(Commit::id)
        else {
            return;
        };

        debug!(from = %self.current_head, to = %target, "redo");
        self.move_current_head(target, Carry::Sticky);
    }

    /// Check out an arbitrary commit of this document.
    ///
    /// Returns `false` without changing anything if `commit` is not stored
    /// here, e.g. because it belongs to another document or was collected.
    pub fn checkout(&mut self, commit: &Commit<D>) -> bool {
        self.checkout_id(commit.id())
    }

    /// [`checkout`](Self::checkout) by identity.
    pub fn checkout_id(&mut self, id: CommitId) -> bool {
        if !self.store.contains(id) {
            warn!(commit = %id, "checkout rejected: commit is not in this document's history");
            return false;
        }

        debug!(from = %self.current_head, to = %id, "checkout");
        self.move_current_head(id, Carry::Sticky);
        true
    }

    /// Throw away uncommitted edits by rebuilding the scratch from the
    /// current head.
    ///
    /// Selection and hover are reset; only the scale factor survives.
    pub fn rollback(&mut self) {
        debug!(commit = %self.current_head, "rollback");
        let id = self.current_head;
        self.rebuild_scratch(id, Carry::ScaleOnly);
    }

    /// Replace the scratch document wholesale, keeping all sticky state.
    ///
    /// Nothing is committed.
    pub fn set_document(&mut self, document: D) {
        let mut scratch = Scratch::new(document);
        scratch.copy_sticky_from(&self.scratch);
        self.scratch = scratch;
    }

    fn move_current_head(&mut self, target: CommitId, carry: Carry) {
        self.rebuild_scratch(target, carry);
        self.current_head = target;
    }

    /// Rebuild the scratch from the snapshot of `id`.
    fn rebuild_scratch(&mut self, id: CommitId, carry: Carry) {
        let snapshot = match self.store.get(id) {
            Some(commit) => Arc::clone(commit.snapshot_arc()),
            None => panic!("{id} is not stored; heads must always name stored commits"),
        };

        let mut scratch = Scratch::new(D::clone(&snapshot));
        match carry {
            Carry::Sticky => scratch.copy_sticky_from(&self.scratch),
            Carry::ScaleOnly => scratch.copy_scale_from(&self.scratch),
        }
        self.scratch = scratch;
    }

    fn garbage_collect(&mut self) {
        let report = gc::collect(
            &mut self.store,
            self.current_head,
            &mut self.branch_head,
            &self.config,
        );
        if report.total() > 0 {
            debug!(
                max_undo = report.max_undo,
                max_redo = report.max_redo,
                unreachable = report.unreachable,
                remaining = self.store.len(),
                "garbage collected commits"
            );
        }
        self.last_gc = report;
    }
}

impl<D> VersionedDocument<D> {
    // ====================================================================
    // History queries
    // ====================================================================

    /// `true` if the current head has a stored parent.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.store
            .parent_of(self.current_head)
            .is_some_and(|p| self.store.contains(p))
    }

    /// `true` if the branch head is strictly ahead of the current head.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redo_distance().is_some()
    }

    /// Hops from the current head to the branch head, if greater than zero.
    fn redo_distance(&self) -> Option<usize> {
        self.store
            .distance(self.branch_head, self.current_head)
            .filter(|d| *d > 0)
    }

    /// Number of consecutive undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.store.lineage(self.current_head).count().saturating_sub(1)
    }

    /// Number of consecutive redo steps available.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_distance().unwrap_or(0)
    }

    /// Messages of the commits that undo would step back over, most recent
    /// first.
    pub fn undo_messages(&self, limit: usize) -> Vec<&str> {
        self.store
            .lineage(self.current_head)
            .take(self.undo_depth().min(limit))
            .map(Commit::message)
            .collect()
    }

    /// Messages of the commits that redo would re-apply, next redo first.
    pub fn redo_messages(&self, limit: usize) -> Vec<&str> {
        let mut ahead: Vec<&str> = self
            .store
            .lineage(self.branch_head)
            .take(self.redo_depth())
            .map(Commit::message)
            .collect();
        ahead.reverse();
        ahead.truncate(limit);
        ahead
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// The commit the scratch was most recently derived from.
    #[must_use]
    pub fn latest_commit(&self) -> &Commit<D> {
        match self.store.get(self.current_head) {
            Some(commit) => commit,
            None => panic!(
                "current head {} is not stored; heads must always name stored commits",
                self.current_head
            ),
        }
    }

    #[must_use]
    pub fn current_head(&self) -> CommitId {
        self.current_head
    }

    #[must_use]
    pub fn branch_head(&self) -> CommitId {
        self.branch_head
    }

    #[must_use]
    pub fn store(&self) -> &CommitStore<D> {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// What the garbage collector erased during the most recent commit.
    #[must_use]
    pub fn last_gc(&self) -> GcReport {
        self.last_gc
    }

    #[must_use]
    pub fn scratch(&self) -> &Scratch<D> {
        &self.scratch
    }

    pub fn scratch_mut(&mut self) -> &mut Scratch<D> {
        &mut self.scratch
    }

    #[must_use]
    pub fn document(&self) -> &D {
        self.scratch.document()
    }

    /// Mutable access to the scratch document. Regenerates its version.
    pub fn document_mut(&mut self) -> &mut D {
        self.scratch.document_mut()
    }

    #[must_use]
    pub fn document_version(&self) -> DocumentVersion {
        self.scratch.version()
    }

    pub fn set_document_version(&mut self, version: DocumentVersion) {
        self.scratch.set_version(version);
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ComponentPath> {
        self.scratch.selected()
    }

    pub fn set_selected(&mut self, path: Option<ComponentPath>) {
        self.scratch.set_selected(path);
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&ComponentPath> {
        self.scratch.hovered()
    }

    pub fn set_hovered(&mut self, path: Option<ComponentPath>) {
        self.scratch.set_hovered(path);
    }

    #[must_use]
    pub fn fixup_scale_factor(&self) -> f32 {
        self.scratch.fixup_scale_factor()
    }

    pub fn set_fixup_scale_factor(&mut self, factor: f32) {
        self.scratch.set_fixup_scale_factor(factor);
    }

    // ====================================================================
    // Filesystem
    // ====================================================================

    #[must_use]
    pub fn disk(&self) -> &DiskState {
        &self.disk
    }

    #[must_use]
    pub fn has_filesystem_location(&self) -> bool {
        self.disk.path().is_some()
    }

    #[must_use]
    pub fn filesystem_path(&self) -> Option<&Path> {
        self.disk.path()
    }

    pub fn set_filesystem_path(&mut self, path: impl Into<PathBuf>) {
        self.disk.set_path(path);
    }

    /// File name to suggest when saving.
    #[must_use]
    pub fn recommended_document_name(&self) -> String {
        self.disk.recommended_name(&self.config.untitled_name)
    }

    /// `true` if the checked-out commit is the one last saved to disk.
    #[must_use]
    pub fn is_up_to_date_with_filesystem(&self) -> bool {
        self.disk.is_saved_at(self.current_head)
    }

    /// Record that the current head was written to disk at `written_at`.
    pub fn set_up_to_date_with_filesystem(&mut self, written_at: DateTime<Utc>) {
        self.disk.mark_saved(self.current_head, written_at);
    }

    #[must_use]
    pub fn last_filesystem_write_time(&self) -> Option<DateTime<Utc>> {
        self.disk.last_write_time()
    }

    /// Record that the caller just wrote the current head to `path`.
    ///
    /// Associates the document with `path` and marks it up to date using the
    /// file's modification time.
    pub fn mark_saved_to(&mut self, path: impl Into<PathBuf>) -> HistoryResult<()> {
        let path = path.into();
        let written_at = disk::modification_time(&path)?;
        info!(
            path = %path.display(),
            commit = %self.current_head,
            "document saved"
        );
        self.disk.set_path(path);
        self.set_up_to_date_with_filesystem(written_at);
        Ok(())
    }

    /// `true` if the file on disk was modified after it was last recorded.
    ///
    /// `false` for documents without a filesystem location. A document with a
    /// location but no recorded write time counts as changed.
    pub fn filesystem_changed(&self) -> HistoryResult<bool> {
        let Some(path) = self.disk.path() else {
            return Ok(false);
        };
        let on_disk = disk::modification_time(path)?;
        Ok(self.disk.last_write_time() != Some(on_disk))
    }
}
