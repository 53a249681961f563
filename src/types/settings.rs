use serde::{Deserialize, Serialize};

use super::query::SortKey;

/// Top-level application settings, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// SQLite file holding the document collections. `None` uses
    /// `bloombook.db` in the platform data directory.
    pub database_path: Option<String>,
    /// Owner identifier to sign in with at startup, if any.
    pub owner_id: Option<String>,
    /// Sort order the bookmark list starts with.
    pub default_sort: SortKey,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            owner_id: None,
            default_sort: SortKey::CreatedDesc,
            log_filter: "info".to_string(),
        }
    }
}
