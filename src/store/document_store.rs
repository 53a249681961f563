//! The document store seam.
//!
//! A store exposes create/find/delete per collection. Filters are exact
//! equality on named top-level fields; `id` addresses the record identifier.

use async_trait::async_trait;
use serde_json::Value;

use super::schema::Collection;
use crate::types::errors::DocumentStoreError;

/// Field holding the record identifier.
pub const ID_FIELD: &str = "id";
/// Field holding the owner identifier.
pub const OWNER_FIELD: &str = "userId";

/// Conjunction of field equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records belonging to `owner_id`.
    pub fn owned_by(owner_id: &str) -> Self {
        Self::new().eq(OWNER_FIELD, owner_id)
    }

    /// Adds the condition `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The string value required for `field`, if the filter constrains it.
    pub fn string_value(&self, field: &str) -> Option<&str> {
        self.conditions
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_str())
    }

    /// Whether a document satisfies every condition.
    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

/// Generic document store consumed by the store client.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Validates and inserts `data`, returning the stored document with its
    /// assigned `id`, `createdAt` and `updatedAt`.
    async fn create(&self, collection: Collection, data: Value) -> Result<Value, DocumentStoreError>;

    /// Returns every document in `collection` matching `filter`, in insertion order.
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, DocumentStoreError>;

    /// Deletes every document in `collection` matching `filter` and returns
    /// how many were removed. Matching nothing is not an error.
    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize, DocumentStoreError>;
}
