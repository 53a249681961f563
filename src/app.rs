//! App Core for BloomBook.
//!
//! Wires the document store, identity, notice queue and library manager
//! together and drives the sign-in lifecycle.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::managers::library_manager::{LibraryManager, LibraryManagerTrait};
use crate::services::identity::{IdentityProvider, StaticIdentity};
use crate::services::notifier::NoticeQueue;
use crate::store::{DocumentStore, SqliteDocumentStore, StoreClient};
use crate::types::errors::AppError;
use crate::types::library::MutationOutcome;
use crate::types::query::BookmarkQuery;
use crate::types::settings::AppSettings;

/// Central application struct.
pub struct App {
    pub identity: Arc<StaticIdentity>,
    pub notices: Arc<NoticeQueue>,
    pub library: LibraryManager,
}

impl App {
    /// Opens the SQLite document store at `db_path` and builds the app on it.
    pub fn open<P: AsRef<Path>>(db_path: P, settings: &AppSettings) -> Result<Self, AppError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = SqliteDocumentStore::open(db_path)?;
        Ok(Self::with_store(Arc::new(store), settings))
    }

    /// Builds the app on an arbitrary document store.
    pub fn with_store(store: Arc<dyn DocumentStore>, settings: &AppSettings) -> Self {
        let identity = Arc::new(StaticIdentity::new(settings.owner_id.clone()));
        let notices = Arc::new(NoticeQueue::new());
        let client = StoreClient::new(store, identity.clone());
        let library = LibraryManager::new(client, notices.clone())
            .with_query(BookmarkQuery::default().with_sort(settings.default_sort));

        Self {
            identity,
            notices,
            library,
        }
    }

    /// Startup sequence: load the library if an owner is already signed in.
    pub async fn startup(&self) -> MutationOutcome {
        match self.identity.current_owner() {
            Some(owner) => {
                info!(owner = %owner, "loading library at startup");
                self.library.load().await
            }
            None => MutationOutcome::Skipped,
        }
    }

    /// Switches to `owner` and loads their library.
    pub async fn sign_in(&self, owner: &str) -> MutationOutcome {
        info!(owner, "signing in");
        self.identity.sign_in(owner);
        self.library.clear();
        self.library.load().await
    }

    /// Forgets the owner and all in-memory data.
    pub fn sign_out(&self) {
        info!("signing out");
        self.identity.sign_out();
        self.library.clear();
    }
}
