use serde::{Deserialize, Serialize};

/// Folder restriction applied by the bookmark filter.
///
/// Serialized as an optional folder name: `null` is [`FolderFilter::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FolderFilter {
    /// No folder restriction.
    #[default]
    All,
    /// Only bookmarks whose folder equals this name exactly.
    /// `Named("")` selects unfoldered bookmarks.
    Named(String),
}

impl From<Option<String>> for FolderFilter {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(name) => FolderFilter::Named(name),
            None => FolderFilter::All,
        }
    }
}

impl From<FolderFilter> for Option<String> {
    fn from(value: FolderFilter) -> Self {
        match value {
            FolderFilter::All => None,
            FolderFilter::Named(name) => Some(name),
        }
    }
}

/// Display order of the bookmark list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first by creation time.
    #[default]
    CreatedDesc,
    /// Alphabetical by title.
    TitleAsc,
}

/// The search box, folder selector, tag badge and sort selector together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkQuery {
    pub search: String,
    pub folder: FolderFilter,
    pub tag: Option<String>,
    pub sort: SortKey,
}

impl BookmarkQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_folder(mut self, folder: FolderFilter) -> Self {
        self.folder = folder;
        self
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}
