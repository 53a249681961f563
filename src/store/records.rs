//! Stored record shapes and their translation to domain types.
//!
//! Records use the store's camelCase field names and keep tags as
//! `[{tag, id}]` rows. Nothing outside the store module sees these shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::bookmark::{Bookmark, BookmarkInput, Folder, Tag};
use crate::types::errors::DocumentStoreError;

/// One row of a bookmark's `tags` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntryRecord {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A bookmark document as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<TagEntryRecord>>,
    pub user_id: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Data for a new bookmark document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmarkRecord<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub folder: &'a str,
    pub tags: Vec<TagEntryRecord>,
    pub user_id: &'a str,
}

impl<'a> NewBookmarkRecord<'a> {
    pub fn from_input(input: &'a BookmarkInput, owner_id: &'a str) -> Self {
        Self {
            title: input.title.trim(),
            url: input.url.trim(),
            description: &input.description,
            folder: input.folder_name().unwrap_or(""),
            tags: input
                .tag_names()
                .into_iter()
                .map(|tag| TagEntryRecord { tag, id: None })
                .collect(),
            user_id: owner_id,
        }
    }
}

/// A folder or tag document; both collections share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRecord {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Data for a new folder or tag document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNamedRecord<'a> {
    pub name: &'a str,
    pub user_id: &'a str,
}

/// Encodes record data for a `DocumentStore::create` call.
pub fn to_document<T: Serialize>(record: &T) -> Result<Value, DocumentStoreError> {
    Ok(serde_json::to_value(record)?)
}

/// Decodes a document returned by the store.
pub fn from_document<T: DeserializeOwned>(doc: Value) -> Result<T, DocumentStoreError> {
    Ok(serde_json::from_value(doc)?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<BookmarkRecord> for Bookmark {
    fn from(record: BookmarkRecord) -> Self {
        Bookmark {
            id: record.id,
            title: record.title,
            url: record.url,
            description: non_empty(record.description),
            folder: non_empty(record.folder),
            tags: record
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry.tag)
                .collect(),
            owner_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<NamedRecord> for Folder {
    fn from(record: NamedRecord) -> Self {
        Folder {
            id: record.id,
            name: record.name,
            owner_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<NamedRecord> for Tag {
    fn from(record: NamedRecord) -> Self {
        Tag {
            id: record.id,
            name: record.name,
            owner_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
