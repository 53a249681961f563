//! Unit tests for the BloomBook error types: display strings and conversions.

use bloombook::types::errors::{
    AppError, DocumentStoreError, InputError, LibraryError, SettingsError, StoreError,
};

#[test]
fn test_authentication_error_message() {
    assert_eq!(StoreError::Authentication.to_string(), "User not authenticated");
}

#[test]
fn test_operation_error_prefixes_context() {
    let err = StoreError::operation(
        "Error creating bookmark",
        DocumentStoreError::Database("disk I/O error".to_string()),
    );
    assert_eq!(
        err.to_string(),
        "Error creating bookmark. Document database error: disk I/O error"
    );
}

#[test]
fn test_operation_error_exposes_source() {
    use std::error::Error;

    let err = StoreError::operation(
        "Error fetching tags",
        DocumentStoreError::Serialization("bad json".to_string()),
    );
    let source = err.source().expect("operation error should carry a source");
    assert_eq!(source.to_string(), "Document serialization error: bad json");
}

#[test]
fn test_validation_error_names_collection() {
    let err = DocumentStoreError::Validation {
        collection: "folders".to_string(),
        message: "name is required".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Validation failed for collection 'folders': name is required"
    );
}

#[test]
fn test_library_error_is_transparent() {
    let input: LibraryError = InputError::EmptyTitle.into();
    assert_eq!(input.to_string(), "Bookmark title is required");

    let store: LibraryError = StoreError::Authentication.into();
    assert_eq!(store.to_string(), "User not authenticated");

    assert_eq!(LibraryError::NotLoaded.to_string(), "Bookmarks are still loading");
}

#[test]
fn test_input_error_messages() {
    assert_eq!(
        InputError::InvalidUrl("ftp://x".to_string()).to_string(),
        "Invalid bookmark url: ftp://x"
    );
    assert_eq!(InputError::EmptyFolderName.to_string(), "Folder name is required");
    assert_eq!(InputError::EmptyTagName.to_string(), "Tag name is required");
}

#[test]
fn test_rusqlite_error_converts_to_database_variant() {
    let err: DocumentStoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, DocumentStoreError::Database(_)));
}

#[test]
fn test_serde_error_converts_to_serialization_variant() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: DocumentStoreError = parse.into();
    assert!(matches!(err, DocumentStoreError::Serialization(_)));
}

#[test]
fn test_settings_and_app_errors() {
    let settings = SettingsError::IoError("permission denied".to_string());
    assert_eq!(settings.to_string(), "Settings I/O error: permission denied");

    let app: AppError = settings.into();
    assert_eq!(app.to_string(), "Settings I/O error: permission denied");

    let app: AppError = rusqlite::Error::InvalidQuery.into();
    assert!(app.to_string().starts_with("Failed to open database: "));
}
