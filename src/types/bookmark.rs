use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::InputError;

/// Represents a saved bookmark.
///
/// `folder` and `tags` hold names, not identifiers: folders and tags are
/// joined to bookmarks by name. An empty folder is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub folder: Option<String>,
    pub tags: Vec<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Bookmark {
    /// Returns the folder name, or `""` for an unfoldered bookmark.
    pub fn folder_name(&self) -> &str {
        self.folder.as_deref().unwrap_or("")
    }

    /// Returns the description, or `""` when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Whether the bookmark carries a tag with exactly this name.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

/// A named folder for grouping bookmarks. Flat, unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// A named tag. Many-to-many with bookmarks, unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// User-supplied fields for a new bookmark, as entered in the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkInput {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BookmarkInput {
    /// Checks the fields the add form marks as required.
    ///
    /// The title must be non-blank and the url must parse as an absolute
    /// `http` or `https` URL.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.title.trim().is_empty() {
            return Err(InputError::EmptyTitle);
        }
        match Url::parse(self.url.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err(InputError::InvalidUrl(self.url.clone())),
        }
    }

    /// The folder name with surrounding whitespace removed; `None` if blank.
    pub fn folder_name(&self) -> Option<&str> {
        let name = self.folder.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Tag names trimmed, blanks dropped, duplicates removed (first wins).
    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !names.iter().any(|n| n == tag) {
                names.push(tag.to_string());
            }
        }
        names
    }
}

/// Splits the comma-separated tag field of the add form into tag names.
///
/// `"development, design ,, productivity"` yields
/// `["development", "design", "productivity"]`.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
