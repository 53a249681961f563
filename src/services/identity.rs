// BloomBook identity seam
// Supplies the owner identifier that scopes every store call.

use std::sync::{PoisonError, RwLock};

/// Source of the currently signed-in owner.
pub trait IdentityProvider: Send + Sync {
    /// The owner identifier, or `None` when nobody is signed in.
    fn current_owner(&self) -> Option<String>;
}

/// Identity held in memory and switched explicitly on sign-in/sign-out.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    owner: RwLock<Option<String>>,
}

impl StaticIdentity {
    pub fn new(owner: Option<String>) -> Self {
        Self {
            owner: RwLock::new(owner),
        }
    }

    pub fn signed_in(owner: impl Into<String>) -> Self {
        Self::new(Some(owner.into()))
    }

    pub fn sign_in(&self, owner: impl Into<String>) {
        *self.owner.write().unwrap_or_else(PoisonError::into_inner) = Some(owner.into());
    }

    pub fn sign_out(&self) {
        *self.owner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_owner(&self) -> Option<String> {
        self.owner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|owner| !owner.is_empty())
    }
}
