//! Library Manager for BloomBook.
//!
//! Implements `LibraryManagerTrait`: owns the in-memory mirror of the
//! signed-in owner's bookmarks, folder names and tag names, and keeps it
//! consistent across load, create and delete.
//!
//! In-memory state changes only after the backing store call succeeds. Every
//! mutation emits a pending notice, then a success or error notice, and
//! returns a [`MutationOutcome`]. Nothing is retried and nothing is rolled
//! back: the three writes behind "add bookmark" succeed or fail on their own.
//!
//! Methods take `&self` and never hold a lock across an `.await`, so
//! independent mutations may be in flight at once; whichever finishes last
//! decides the final state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::services::bookmark_filter::{self, apply_query};
use crate::services::notifier::Notifier;
use crate::store::StoreClient;
use crate::types::bookmark::{Bookmark, BookmarkInput};
use crate::types::errors::{InputError, LibraryError};
use crate::types::library::{CreateBookmarkOutcome, LibraryState, LibraryView, MutationOutcome};
use crate::types::notification::{Action, Notice};
use crate::types::query::{BookmarkQuery, FolderFilter, SortKey};

/// Trait defining library operations driven by UI actions.
#[async_trait]
pub trait LibraryManagerTrait {
    /// Fetches bookmarks, folders and tags for the owner and replaces the
    /// in-memory state. The view reports `Loading` until this succeeds.
    async fn load(&self) -> MutationOutcome;
    async fn create_bookmark(&self, input: BookmarkInput) -> CreateBookmarkOutcome;
    async fn create_folder(&self, name: &str) -> MutationOutcome;
    async fn create_tag(&self, name: &str) -> MutationOutcome;
    async fn delete_folder(&self, name: &str) -> MutationOutcome;
    async fn delete_tag(&self, name: &str) -> MutationOutcome;
    async fn delete_bookmark(&self, id: &str) -> MutationOutcome;
    /// The filtered, sorted list for the current query.
    fn view(&self) -> LibraryView;
    fn snapshot(&self) -> LibraryState;
    fn query(&self) -> BookmarkQuery;
    fn set_query(&self, query: BookmarkQuery);
}

/// Client state controller. Cloning yields a handle to the same state.
#[derive(Clone)]
pub struct LibraryManager {
    client: StoreClient,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<LibraryState>>,
    query: Arc<Mutex<BookmarkQuery>>,
}

impl LibraryManager {
    pub fn new(client: StoreClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            state: Arc::new(Mutex::new(LibraryState::default())),
            query: Arc::new(Mutex::new(BookmarkQuery::default())),
        }
    }

    /// Starts with the given query instead of the default one.
    pub fn with_query(self, query: BookmarkQuery) -> Self {
        self.set_query(query);
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, LibraryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_query(&self) -> MutexGuard<'_, BookmarkQuery> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut LibraryState) -> R) -> R {
        f(&mut self.lock_state())
    }

    fn update_query(&self, f: impl FnOnce(&mut BookmarkQuery)) {
        f(&mut self.lock_query());
    }

    pub fn set_search(&self, search: &str) {
        self.update_query(|q| q.search = search.to_string());
    }

    pub fn select_folder(&self, folder: FolderFilter) {
        self.update_query(|q| q.folder = folder);
    }

    pub fn select_tag(&self, tag: Option<String>) {
        self.update_query(|q| q.tag = tag);
    }

    /// Selects `tag`, or clears the selection if it is already selected.
    pub fn toggle_tag(&self, tag: &str) {
        self.update_query(|q| q.tag = bookmark_filter::toggle_tag(q.tag.as_deref(), tag));
    }

    pub fn set_sort(&self, sort: SortKey) {
        self.update_query(|q| q.sort = sort);
    }

    /// Drops all in-memory data and returns to the loading state, e.g. on sign-out.
    pub fn clear(&self) {
        self.with_state(|s| *s = LibraryState::default());
    }

    // ─── Notice plumbing ───

    fn begin(&self, action: Action) {
        debug!(?action, "mutation pending");
        self.notifier.notify(Notice::pending(action));
    }

    fn commit<T>(&self, action: Action, value: T) -> MutationOutcome<T> {
        info!(?action, "mutation committed");
        self.notifier.notify(Notice::success(action));
        MutationOutcome::Committed(value)
    }

    fn fail<T>(&self, action: Action, err: impl Into<LibraryError>) -> MutationOutcome<T> {
        let err = err.into();
        warn!(?action, error = %err, "mutation failed");
        self.notifier.notify(Notice::error(action, err.to_string()));
        MutationOutcome::Failed(err)
    }

    // ─── Store calls followed by reconciliation ───

    async fn insert_bookmark(&self, input: &BookmarkInput) -> MutationOutcome<Bookmark> {
        self.begin(Action::CreateBookmark);
        match self.client.create_bookmark(input).await {
            Ok(bookmark) => {
                self.with_state(|s| s.apply_bookmark_created(bookmark.clone()));
                self.commit(Action::CreateBookmark, bookmark)
            }
            Err(e) => self.fail(Action::CreateBookmark, e),
        }
    }

    async fn insert_folder(&self, name: &str) -> MutationOutcome {
        self.begin(Action::CreateFolder);
        match self.client.create_folder(name).await {
            Ok(_) => {
                self.with_state(|s| s.apply_folder_created(name));
                self.commit(Action::CreateFolder, ())
            }
            Err(e) => self.fail(Action::CreateFolder, e),
        }
    }

    async fn insert_tag(&self, name: &str) -> MutationOutcome {
        self.begin(Action::CreateTag);
        match self.client.create_tag(name).await {
            Ok(_) => {
                self.with_state(|s| s.apply_tag_created(name));
                self.commit(Action::CreateTag, ())
            }
            Err(e) => self.fail(Action::CreateTag, e),
        }
    }

    async fn insert_folder_if_new(&self, name: Option<&str>) -> MutationOutcome {
        match name {
            Some(name) => self.insert_folder(name).await,
            None => MutationOutcome::Skipped,
        }
    }

    async fn insert_tags(&self, names: &[String]) -> Vec<(String, MutationOutcome)> {
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            outcomes.push((name.clone(), self.insert_tag(name).await));
        }
        outcomes
    }
}

/// Names in first-seen order without duplicates.
fn unique_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

#[async_trait]
impl LibraryManagerTrait for LibraryManager {
    async fn load(&self) -> MutationOutcome {
        self.begin(Action::LoadLibrary);
        let fetched = tokio::try_join!(
            self.client.get_user_bookmarks(),
            self.client.get_user_folders(),
            self.client.get_user_tags(),
        );
        match fetched {
            Ok((bookmarks, folders, tags)) => {
                let folders = unique_names(folders.into_iter().map(|f| f.name));
                let tags = unique_names(tags.into_iter().map(|t| t.name));
                debug!(
                    bookmarks = bookmarks.len(),
                    folders = folders.len(),
                    tags = tags.len(),
                    "library loaded"
                );
                self.with_state(|s| *s = LibraryState::loaded(bookmarks, folders, tags));
                self.commit(Action::LoadLibrary, ())
            }
            Err(e) => self.fail(Action::LoadLibrary, e),
        }
    }

    /// Persists the bookmark, plus its folder and tags when they are new.
    ///
    /// Refused with [`LibraryError::NotLoaded`] until the library has loaded.
    /// The three writes run concurrently and independently. A failed folder
    /// or tag write leaves the created bookmark in place, and vice versa.
    async fn create_bookmark(&self, input: BookmarkInput) -> CreateBookmarkOutcome {
        if let Err(e) = input.validate() {
            return CreateBookmarkOutcome {
                bookmark: self.fail(Action::CreateBookmark, e),
                folder: MutationOutcome::Skipped,
                tags: Vec::new(),
            };
        }

        // Known names are only available once loaded.
        let plan = self.with_state(|s| {
            s.is_loaded().then(|| {
                let folder = input
                    .folder_name()
                    .filter(|name| !s.has_folder(name))
                    .map(str::to_string);
                let tags: Vec<String> = input
                    .tag_names()
                    .into_iter()
                    .filter(|name| !s.has_tag(name))
                    .collect();
                (folder, tags)
            })
        });
        let Some((new_folder, new_tags)) = plan else {
            return CreateBookmarkOutcome {
                bookmark: self.fail(Action::CreateBookmark, LibraryError::NotLoaded),
                folder: MutationOutcome::Skipped,
                tags: Vec::new(),
            };
        };

        let (bookmark, folder, tags) = tokio::join!(
            self.insert_bookmark(&input),
            self.insert_folder_if_new(new_folder.as_deref()),
            self.insert_tags(&new_tags),
        );

        CreateBookmarkOutcome { bookmark, folder, tags }
    }

    async fn create_folder(&self, name: &str) -> MutationOutcome {
        let name = name.trim();
        if name.is_empty() {
            return self.fail(Action::CreateFolder, InputError::EmptyFolderName);
        }
        match self.with_state(|s| s.is_loaded().then(|| s.has_folder(name))) {
            None => self.fail(Action::CreateFolder, LibraryError::NotLoaded),
            Some(true) => {
                debug!(name, "folder already exists");
                MutationOutcome::Skipped
            }
            Some(false) => self.insert_folder(name).await,
        }
    }

    async fn create_tag(&self, name: &str) -> MutationOutcome {
        let name = name.trim();
        if name.is_empty() {
            return self.fail(Action::CreateTag, InputError::EmptyTagName);
        }
        match self.with_state(|s| s.is_loaded().then(|| s.has_tag(name))) {
            None => self.fail(Action::CreateTag, LibraryError::NotLoaded),
            Some(true) => {
                debug!(name, "tag already exists");
                MutationOutcome::Skipped
            }
            Some(false) => self.insert_tag(name).await,
        }
    }

    async fn delete_folder(&self, name: &str) -> MutationOutcome {
        self.begin(Action::DeleteFolder);
        match self.client.delete_folder_by_name(name).await {
            Ok(()) => {
                self.with_state(|s| s.apply_folder_deleted(name));
                self.commit(Action::DeleteFolder, ())
            }
            Err(e) => self.fail(Action::DeleteFolder, e),
        }
    }

    async fn delete_tag(&self, name: &str) -> MutationOutcome {
        self.begin(Action::DeleteTag);
        match self.client.delete_tag_by_name(name).await {
            Ok(()) => {
                self.with_state(|s| s.apply_tag_deleted(name));
                self.commit(Action::DeleteTag, ())
            }
            Err(e) => self.fail(Action::DeleteTag, e),
        }
    }

    async fn delete_bookmark(&self, id: &str) -> MutationOutcome {
        self.begin(Action::DeleteBookmark);
        match self.client.delete_bookmark(id).await {
            Ok(()) => {
                self.with_state(|s| s.apply_bookmark_deleted(id));
                self.commit(Action::DeleteBookmark, ())
            }
            Err(e) => self.fail(Action::DeleteBookmark, e),
        }
    }

    fn view(&self) -> LibraryView {
        let query = self.query();
        let state = self.lock_state();
        if !state.is_loaded() {
            return LibraryView::Loading;
        }
        LibraryView::Ready(apply_query(&state.bookmarks, &query))
    }

    fn snapshot(&self) -> LibraryState {
        self.lock_state().clone()
    }

    fn query(&self) -> BookmarkQuery {
        self.lock_query().clone()
    }

    fn set_query(&self, query: BookmarkQuery) {
        *self.lock_query() = query;
    }
}
