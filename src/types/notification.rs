use serde::{Deserialize, Serialize};

/// User-triggered actions that produce notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    LoadLibrary,
    CreateBookmark,
    DeleteBookmark,
    CreateFolder,
    DeleteFolder,
    CreateTag,
    DeleteTag,
}

impl Action {
    /// Message shown while the backing call is in flight.
    pub fn pending_message(&self) -> &'static str {
        match self {
            Action::LoadLibrary => "Loading bookmarks...",
            Action::CreateBookmark => "Adding bookmark...",
            Action::DeleteBookmark => "Deleting bookmark...",
            Action::CreateFolder => "Adding folder...",
            Action::DeleteFolder => "Deleting folder...",
            Action::CreateTag => "Adding tag...",
            Action::DeleteTag => "Deleting tag...",
        }
    }

    /// Message shown once the backing call succeeded.
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::LoadLibrary => "Bookmarks loaded",
            Action::CreateBookmark => "Bookmark added successfully",
            Action::DeleteBookmark => "Bookmark deleted successfully",
            Action::CreateFolder => "Folder added successfully",
            Action::DeleteFolder => "Folder deleted successfully",
            Action::CreateTag => "Tag added successfully",
            Action::DeleteTag => "Tag deleted successfully",
        }
    }
}

/// Phase of a mutation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Pending,
    Success,
    Error,
}

/// A toast-style notification. Purely informative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub action: Action,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn pending(action: Action) -> Self {
        Self {
            action,
            level: NoticeLevel::Pending,
            message: action.pending_message().to_string(),
        }
    }

    pub fn success(action: Action) -> Self {
        Self {
            action,
            level: NoticeLevel::Success,
            message: action.success_message().to_string(),
        }
    }

    pub fn error(action: Action, message: impl Into<String>) -> Self {
        Self {
            action,
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
