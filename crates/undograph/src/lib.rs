#![forbid(unsafe_code)]

//! undograph
//!
//! Snapshot-based undo/redo for an editable document, organised as a small
//! in-process commit graph.
//!
//! # Key Components
//!
//! - [`VersionedDocument`] - Scratch document plus commit graph; commit, undo,
//!   redo, checkout, rollback
//! - [`Scratch`] - The mutable working copy and its sticky UI state
//! - [`HistoryConfig`] - Undo/redo depth bounds, loadable from TOML or JSON
//! - [`gc`] - The three garbage collection passes run after every commit
//! - [`DiskState`] - Link between a document and the file it was saved to
//!
//! # Quick Start
//!
//! ```
//! use undograph::VersionedDocument;
//!
//! let mut doc = VersionedDocument::new(String::from("draft"));
//! doc.document_mut().push_str(" v2");
//! doc.commit("append v2");
//!
//! doc.undo();
//! assert_eq!(doc.document(), "draft");
//!
//! doc.redo();
//! assert_eq!(doc.document(), "draft v2");
//! ```
//!
//! # Role in undograph
//! `undograph` is the state machine. Storage and traversal live in
//! `undograph-core`; this crate decides which commits are checked out and
//! which ones are kept.

pub mod config;
pub mod disk;
pub mod document;
pub mod error;
pub mod gc;
pub mod scratch;

pub use config::{DEFAULT_MAX_REDO, DEFAULT_MAX_UNDO, DEFAULT_UNTITLED_NAME, HistoryConfig};
pub use disk::DiskState;
pub use document::{NEW_DOCUMENT_MESSAGE, VersionedDocument};
pub use error::{HistoryError, HistoryResult};
pub use gc::GcReport;
pub use scratch::{ComponentPath, Scratch, StickyState};

pub use undograph_core::{Commit, CommitId, CommitStore, DocumentVersion, Lineage};
