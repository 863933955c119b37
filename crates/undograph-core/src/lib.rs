#![forbid(unsafe_code)]

//! Core: commit identities, immutable commits, and the commit arena.
//!
//! # Role in undograph
//! `undograph-core` is the storage layer. It knows nothing about scratch
//! documents, sticky UI state, or head pointers; it only stores commits and
//! answers structural questions about the parent chain.
//!
//! # Primary responsibilities
//! - **CommitId**: opaque, process-unique commit identity.
//! - **DocumentVersion**: opaque marker that downstream caches compare to
//!   detect in-place document edits.
//! - **Commit**: immutable snapshot record with a parent link and message.
//! - **CommitStore**: id-keyed arena with ancestor traversal helpers.
//!
//! # How it fits in the system
//! The `undograph` crate owns a [`CommitStore`] and layers the
//! commit/undo/redo/checkout state machine and garbage collection on top.
//! All traversal goes through key lookups, so erasing commits mid-walk never
//! invalidates anything the walker holds.

pub mod commit;
pub mod commit_id;
pub mod commit_store;

pub use commit::Commit;
pub use commit_id::{CommitId, DocumentVersion};
pub use commit_store::{CommitStore, Lineage};
