use thiserror::Error;

// === DocumentStoreError ===

/// Raw failures reported by a document store implementation.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The underlying database rejected the operation.
    #[error("Document database error: {0}")]
    Database(String),
    /// A document could not be encoded or decoded.
    #[error("Document serialization error: {0}")]
    Serialization(String),
    /// A document did not satisfy its collection schema.
    #[error("Validation failed for collection '{collection}': {message}")]
    Validation { collection: String, message: String },
}

impl From<rusqlite::Error> for DocumentStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<serde_json::Error> for DocumentStoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

// === StoreError ===

/// Errors surfaced by the store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No owner identifier was available; the store was never called.
    #[error("User not authenticated")]
    Authentication,
    /// The backing create/find/delete call failed.
    ///
    /// `context` names the operation, e.g. `"Error creating bookmark"`.
    #[error("{context}. {cause}")]
    Operation {
        context: String,
        #[source]
        cause: DocumentStoreError,
    },
}

impl StoreError {
    pub fn operation(context: impl Into<String>, cause: DocumentStoreError) -> Self {
        Self::Operation {
            context: context.into(),
            cause,
        }
    }
}

// === InputError ===

/// User input rejected before any store call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The bookmark title is empty or whitespace.
    #[error("Bookmark title is required")]
    EmptyTitle,
    /// The bookmark url is not an absolute http(s) URL.
    #[error("Invalid bookmark url: {0}")]
    InvalidUrl(String),
    /// A folder name is empty or whitespace.
    #[error("Folder name is required")]
    EmptyFolderName,
    /// A tag name is empty or whitespace.
    #[error("Tag name is required")]
    EmptyTagName,
}

// === LibraryError ===

/// Errors a library mutation can fail with.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Input(#[from] InputError),
    /// Known folder and tag names are not available until the library loads.
    #[error("Bookmarks are still loading")]
    NotLoaded,
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
}

// === AppError ===

/// Errors raised while wiring the application together.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to open database: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
