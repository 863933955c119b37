#![forbid(unsafe_code)]

//! The mutable working copy of a document.
//!
//! A [`Scratch`] wraps the document the application edits directly between
//! commits, together with:
//!
//! - a [`DocumentVersion`] that changes whenever mutable access is taken, so
//!   renderers can tell when derived data is stale, and
//! - the [`StickyState`]: selection, hover, and the fixup scale factor. This
//!   is UI state, not versioned content. It is never stored in a commit and
//!   is carried forward whenever the scratch is rebuilt from a commit.

use std::fmt;

use undograph_core::DocumentVersion;

/// Opaque path to a component inside a document.
///
/// The commit graph never interprets it; it only copies it around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentPath(String);

impl ComponentPath {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ComponentPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UI state that survives undo, redo, and checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct StickyState {
    /// Currently selected component, if any.
    pub selected: Option<ComponentPath>,
    /// Component under the pointer, if any.
    pub hovered: Option<ComponentPath>,
    /// Scales decorations up or down for very small or very large models.
    pub fixup_scale_factor: f32,
}

impl Default for StickyState {
    fn default() -> Self {
        Self {
            selected: None,
            hovered: None,
            fixup_scale_factor: 1.0,
        }
    }
}

/// Mutable working copy of a document plus its sticky UI state.
#[derive(Clone)]
pub struct Scratch<D> {
    document: D,
    version: DocumentVersion,
    sticky: StickyState,
}

impl<D: fmt::Debug> fmt::Debug for Scratch<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scratch")
            .field("document", &self.document)
            .field("version", &self.version)
            .field("sticky", &self.sticky)
            .finish()
    }
}

impl<D> Scratch<D> {
    /// Wrap a document with default sticky state and a fresh version.
    #[must_use]
    pub fn new(document: D) -> Self {
        Self {
            document,
            version: DocumentVersion::fresh(),
            sticky: StickyState::default(),
        }
    }

    // ====================================================================
    // Document
    // ====================================================================

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the document.
    ///
    /// Regenerates the version marker: callers are assumed to edit.
    pub fn document_mut(&mut self) -> &mut D {
        self.version = DocumentVersion::fresh();
        &mut self.document
    }

    #[must_use]
    pub fn into_document(self) -> D {
        self.document
    }

    #[must_use]
    pub fn version(&self) -> DocumentVersion {
        self.version
    }

    /// Override the version marker, e.g. after an edit that callers know
    /// did not change anything derived data depends on.
    pub fn set_version(&mut self, version: DocumentVersion) {
        self.version = version;
    }

    // ====================================================================
    // Sticky state
    // ====================================================================

    #[must_use]
    pub fn sticky(&self) -> &StickyState {
        &self.sticky
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ComponentPath> {
        self.sticky.selected.as_ref()
    }

    pub fn set_selected(&mut self, path: Option<ComponentPath>) {
        self.sticky.selected = path;
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&ComponentPath> {
        self.sticky.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, path: Option<ComponentPath>) {
        self.sticky.hovered = path;
    }

    #[must_use]
    pub fn fixup_scale_factor(&self) -> f32 {
        self.sticky.fixup_scale_factor
    }

    pub fn set_fixup_scale_factor(&mut self, factor: f32) {
        self.sticky.fixup_scale_factor = factor;
    }

    /// Copy every sticky field from `other`.
    pub fn copy_sticky_from<E>(&mut self, other: &Scratch<E>) {
        self.sticky = other.sticky.clone();
    }

    /// Copy only the fixup scale factor from `other`.
    pub fn copy_scale_from<E>(&mut self, other: &Scratch<E>) {
        self.sticky.fixup_scale_factor = other.sticky.fixup_scale_factor;
    }
}
