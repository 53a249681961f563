//! In-memory mirror of one owner's library and the outcome types of its
//! mutations.
//!
//! The `apply_*` methods on [`LibraryState`] are the client-side
//! reconciliation rules. The store never cascades folder or tag deletion, so
//! these are the only place dangling references get cleared.

use serde::Serialize;

use super::bookmark::Bookmark;
use super::errors::LibraryError;

/// Whether the initial load has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
}

/// Bookmarks, folder names and tag names for the signed-in owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryState {
    pub bookmarks: Vec<Bookmark>,
    pub folders: Vec<String>,
    pub tags: Vec<String>,
    pub load_state: LoadState,
}

impl LibraryState {
    /// A ready state holding the given collections.
    pub fn loaded(bookmarks: Vec<Bookmark>, folders: Vec<String>, tags: Vec<String>) -> Self {
        Self {
            bookmarks,
            folders,
            tags,
            load_state: LoadState::Ready,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn has_folder(&self, name: &str) -> bool {
        self.folders.iter().any(|f| f == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Prepends a newly created bookmark.
    pub fn apply_bookmark_created(&mut self, bookmark: Bookmark) {
        self.bookmarks.insert(0, bookmark);
    }

    /// Removes the bookmark with the given identifier, if present.
    pub fn apply_bookmark_deleted(&mut self, id: &str) {
        self.bookmarks.retain(|b| b.id != id);
    }

    /// Appends a folder name unless it is already known.
    pub fn apply_folder_created(&mut self, name: &str) {
        if !self.has_folder(name) {
            self.folders.push(name.to_string());
        }
    }

    /// Appends a tag name unless it is already known.
    pub fn apply_tag_created(&mut self, name: &str) {
        if !self.has_tag(name) {
            self.tags.push(name.to_string());
        }
    }

    /// Forgets the folder and clears it from every bookmark filed under it.
    pub fn apply_folder_deleted(&mut self, name: &str) {
        self.folders.retain(|f| f != name);
        for bookmark in &mut self.bookmarks {
            if bookmark.folder.as_deref() == Some(name) {
                bookmark.folder = None;
            }
        }
    }

    /// Forgets the tag and strips every matching entry from every bookmark.
    pub fn apply_tag_deleted(&mut self, name: &str) {
        self.tags.retain(|t| t != name);
        for bookmark in &mut self.bookmarks {
            bookmark.tags.retain(|t| t != name);
        }
    }
}

/// What the bookmark list should render.
///
/// `Loading` ("no data yet") is distinct from `Ready` with an empty list
/// ("confirmed zero bookmarks").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "bookmarks", rename_all = "snake_case")]
pub enum LibraryView {
    Loading,
    Ready(Vec<Bookmark>),
}

impl LibraryView {
    pub fn is_loading(&self) -> bool {
        matches!(self, LibraryView::Loading)
    }

    /// The visible bookmarks; empty while loading.
    pub fn bookmarks(&self) -> &[Bookmark] {
        match self {
            LibraryView::Loading => &[],
            LibraryView::Ready(bookmarks) => bookmarks,
        }
    }
}

/// Terminal state of one mutation.
#[derive(Debug)]
pub enum MutationOutcome<T = ()> {
    /// The backing call succeeded and in-memory state was updated.
    Committed(T),
    /// Nothing to do, e.g. the folder or tag already exists.
    Skipped,
    /// The call was rejected or failed; an error notice was emitted.
    Failed(LibraryError),
}

impl<T> MutationOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, MutationOutcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MutationOutcome::Failed(_))
    }

    pub fn committed(&self) -> Option<&T> {
        match self {
            MutationOutcome::Committed(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LibraryError> {
        match self {
            MutationOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcomes of the three independent writes behind "add bookmark".
#[derive(Debug)]
pub struct CreateBookmarkOutcome {
    pub bookmark: MutationOutcome<Bookmark>,
    /// `Skipped` when no folder was given or it was already known.
    pub folder: MutationOutcome,
    /// One entry per tag name that was not already known.
    pub tags: Vec<(String, MutationOutcome)>,
}
