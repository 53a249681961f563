// BloomBook notification surface
// Fire-and-forget pending/success/error notices for each mutation.

use std::sync::{Mutex, PoisonError};

use crate::types::notification::Notice;

/// Receives notices. Implementations must not fail or block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Buffers notices until the UI drains them.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every buffered notice, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Removes and returns every buffered notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
