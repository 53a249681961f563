//! Unit tests for the LibraryManager: load, create and delete flows, the
//! reconciliation rules, partial failure and notices.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use bloombook::managers::library_manager::{LibraryManager, LibraryManagerTrait};
use bloombook::services::identity::StaticIdentity;
use bloombook::services::notifier::NoticeQueue;
use bloombook::store::{Collection, DocumentStore, Filter, SqliteDocumentStore, StoreClient};
use bloombook::types::bookmark::BookmarkInput;
use bloombook::types::errors::{DocumentStoreError, InputError, LibraryError, StoreError};
use bloombook::types::library::LibraryView;
use bloombook::types::notification::{Action, NoticeLevel};
use bloombook::types::query::{BookmarkQuery, FolderFilter, SortKey};

/// SQLite store that can be told to fail every call against one collection.
struct ProbeStore {
    inner: SqliteDocumentStore,
    calls: AtomicUsize,
    failing: std::sync::Mutex<Option<Collection>>,
}

impl ProbeStore {
    fn new() -> Self {
        Self {
            inner: SqliteDocumentStore::open_in_memory().expect("in-memory store"),
            calls: AtomicUsize::new(0),
            failing: std::sync::Mutex::new(None),
        }
    }

    fn fail_on(&self, collection: Option<Collection>) {
        *self.failing.lock().unwrap() = collection;
    }

    fn check(&self, collection: Collection) -> Result<(), DocumentStoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() == Some(collection) {
            return Err(DocumentStoreError::Database("connection refused".to_string()));
        }
        Ok(())
    }

    async fn count(&self, collection: Collection, owner: &str) -> usize {
        self.inner.find(collection, &Filter::owned_by(owner)).await.unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for ProbeStore {
    async fn create(&self, collection: Collection, data: Value) -> Result<Value, DocumentStoreError> {
        self.check(collection)?;
        self.inner.create(collection, data).await
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, DocumentStoreError> {
        self.check(collection)?;
        self.inner.find(collection, filter).await
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize, DocumentStoreError> {
        self.check(collection)?;
        self.inner.delete(collection, filter).await
    }
}

struct Harness {
    manager: LibraryManager,
    notices: Arc<NoticeQueue>,
    store: Arc<ProbeStore>,
    identity: Arc<StaticIdentity>,
}

fn harness() -> Harness {
    let store = Arc::new(ProbeStore::new());
    let identity = Arc::new(StaticIdentity::signed_in("u1"));
    let notices = Arc::new(NoticeQueue::new());
    let client = StoreClient::new(store.clone(), identity.clone());
    let manager = LibraryManager::new(client, notices.clone());
    Harness {
        manager,
        notices,
        store,
        identity,
    }
}

async fn loaded_harness() -> Harness {
    let h = harness();
    assert!(h.manager.load().await.is_committed());
    h.notices.drain();
    h
}

fn input(title: &str, url: &str, folder: &str, tags: &[&str]) -> BookmarkInput {
    BookmarkInput {
        title: title.to_string(),
        url: url.to_string(),
        description: String::new(),
        folder: folder.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

// ─── Load ───

#[tokio::test]
async fn test_view_is_loading_until_load_completes() {
    let h = harness();
    assert_eq!(h.manager.view(), LibraryView::Loading);

    assert!(h.manager.load().await.is_committed());

    let view = h.manager.view();
    assert!(!view.is_loading());
    assert_eq!(view, LibraryView::Ready(Vec::new()));
}

#[tokio::test]
async fn test_load_reads_existing_records() {
    let h = harness();
    let seed = StoreClient::new(h.store.clone(), h.identity.clone());
    seed.create_bookmark(&input("Rust", "https://rust-lang.org", "Work", &["rust"]))
        .await
        .unwrap();
    seed.create_folder("Work").await.unwrap();
    seed.create_tag("rust").await.unwrap();

    assert!(h.manager.load().await.is_committed());
    let state = h.manager.snapshot();
    assert_eq!(state.bookmarks.len(), 1);
    assert_eq!(state.folders, vec!["Work"]);
    assert_eq!(state.tags, vec!["rust"]);
}

#[tokio::test]
async fn test_failed_load_stays_loading() {
    let h = harness();
    h.store.fail_on(Some(Collection::Tags));

    let outcome = h.manager.load().await;

    assert!(outcome.is_failed());
    assert!(outcome.error().unwrap().to_string().starts_with("Error fetching tags. "));
    assert!(h.manager.view().is_loading());
    let notices = h.notices.drain();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_signed_out_mutations_fail_without_store_calls() {
    let h = loaded_harness().await;
    let calls_before = h.store.calls.load(Ordering::SeqCst);
    h.identity.sign_out();

    let outcome = h.manager.create_folder("Work").await;

    assert!(matches!(
        outcome.error(),
        Some(LibraryError::Store(StoreError::Authentication))
    ));
    assert_eq!(h.store.calls.load(Ordering::SeqCst), calls_before);
    assert!(h.manager.snapshot().folders.is_empty());
}

// ─── Create ───

#[tokio::test]
async fn test_create_before_load_does_not_duplicate_names() {
    let h = harness();
    let seed = StoreClient::new(h.store.clone(), h.identity.clone());
    seed.create_folder("Work").await.unwrap();
    seed.create_tag("rust").await.unwrap();

    let outcome = h
        .manager
        .create_bookmark(input("Rust", "https://rust-lang.org", "Work", &["rust"]))
        .await;
    assert!(matches!(outcome.bookmark.error(), Some(LibraryError::NotLoaded)));
    assert!(outcome.folder.is_skipped());
    assert!(outcome.tags.is_empty());

    assert!(matches!(
        h.manager.create_folder("Work").await.error(),
        Some(LibraryError::NotLoaded)
    ));
    assert!(matches!(
        h.manager.create_tag("rust").await.error(),
        Some(LibraryError::NotLoaded)
    ));

    assert_eq!(h.store.count(Collection::Folders, "u1").await, 1);
    assert_eq!(h.store.count(Collection::Tags, "u1").await, 1);
    assert_eq!(h.store.count(Collection::Bookmarks, "u1").await, 0);
    let notices = h.notices.drain();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
    assert_eq!(notices[0].message, "Bookmarks are still loading");
}

#[tokio::test]
async fn test_create_after_failed_load_is_refused() {
    let h = harness();
    StoreClient::new(h.store.clone(), h.identity.clone())
        .create_folder("Work")
        .await
        .unwrap();
    h.store.fail_on(Some(Collection::Tags));
    assert!(h.manager.load().await.is_failed());
    h.store.fail_on(None);

    assert!(h.manager.create_folder("Work").await.is_failed());
    assert_eq!(h.store.count(Collection::Folders, "u1").await, 1);

    assert!(h.manager.load().await.is_committed());
    assert!(h.manager.create_folder("Work").await.is_skipped());
    assert_eq!(h.store.count(Collection::Folders, "u1").await, 1);
}

#[tokio::test]
async fn test_create_bookmark_with_new_folder_and_tags() {
    let h = loaded_harness().await;

    let outcome = h
        .manager
        .create_bookmark(input("React", "https://react.dev", "Work", &["react", "frontend"]))
        .await;

    let bookmark = outcome.bookmark.committed().expect("bookmark committed").clone();
    assert!(outcome.folder.is_committed());
    let tag_names: Vec<&str> = outcome.tags.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(tag_names, vec!["react", "frontend"]);
    assert!(outcome.tags.iter().all(|(_, o)| o.is_committed()));

    let state = h.manager.snapshot();
    assert_eq!(state.bookmarks, vec![bookmark]);
    assert_eq!(state.folders, vec!["Work"]);
    assert_eq!(state.tags, vec!["react", "frontend"]);
}

#[tokio::test]
async fn test_known_folder_and_tags_are_not_recreated() {
    let h = loaded_harness().await;
    h.manager
        .create_bookmark(input("React", "https://react.dev", "Work", &["react"]))
        .await;

    let outcome = h
        .manager
        .create_bookmark(input("Vue", "https://vuejs.org", "Work", &["react", "vue"]))
        .await;

    assert!(outcome.bookmark.is_committed());
    assert!(outcome.folder.is_skipped());
    assert_eq!(outcome.tags.len(), 1);
    assert_eq!(outcome.tags[0].0, "vue");
    assert_eq!(h.store.count(Collection::Folders, "u1").await, 1);
    assert_eq!(h.store.count(Collection::Tags, "u1").await, 2);

    // Newest bookmark is prepended.
    let state = h.manager.snapshot();
    assert_eq!(state.bookmarks[0].title, "Vue");
    assert_eq!(state.bookmarks[1].title, "React");
}

#[tokio::test]
async fn test_create_bookmark_without_folder_or_tags() {
    let h = loaded_harness().await;
    let outcome = h
        .manager
        .create_bookmark(input("Docs", "https://docs.rs", "  ", &[" ", ""]))
        .await;

    assert!(outcome.bookmark.is_committed());
    assert!(outcome.folder.is_skipped());
    assert!(outcome.tags.is_empty());
    assert!(h.manager.snapshot().folders.is_empty());
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_the_store() {
    let h = loaded_harness().await;
    let calls_before = h.store.calls.load(Ordering::SeqCst);

    let outcome = h.manager.create_bookmark(input("  ", "https://x.dev", "Work", &["a"])).await;
    assert!(matches!(
        outcome.bookmark.error(),
        Some(LibraryError::Input(InputError::EmptyTitle))
    ));
    assert!(outcome.folder.is_skipped());
    assert!(outcome.tags.is_empty());

    let outcome = h.manager.create_bookmark(input("X", "not a url", "", &[])).await;
    assert!(matches!(
        outcome.bookmark.error(),
        Some(LibraryError::Input(InputError::InvalidUrl(_)))
    ));

    assert_eq!(h.store.calls.load(Ordering::SeqCst), calls_before);
    let notices = h.notices.drain();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
    assert_eq!(notices[0].message, "Bookmark title is required");
}

#[tokio::test]
async fn test_tag_failure_keeps_bookmark() {
    let h = loaded_harness().await;
    h.store.fail_on(Some(Collection::Tags));

    let outcome = h
        .manager
        .create_bookmark(input("React", "https://react.dev", "Work", &["react"]))
        .await;

    assert!(outcome.bookmark.is_committed());
    assert!(outcome.folder.is_committed());
    assert!(outcome.tags[0].1.is_failed());

    let state = h.manager.snapshot();
    assert_eq!(state.bookmarks.len(), 1);
    assert_eq!(state.bookmarks[0].tags, vec!["react"]);
    assert_eq!(state.folders, vec!["Work"]);
    assert!(state.tags.is_empty());

    let notices = h.notices.drain();
    let errors: Vec<_> = notices.iter().filter(|n| n.level == NoticeLevel::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].action, Action::CreateTag);
    assert!(errors[0].message.starts_with("Error creating tag. "));
}

#[tokio::test]
async fn test_bookmark_failure_keeps_folder() {
    let h = loaded_harness().await;
    h.store.fail_on(Some(Collection::Bookmarks));

    let outcome = h
        .manager
        .create_bookmark(input("React", "https://react.dev", "Work", &[]))
        .await;

    assert!(outcome.bookmark.is_failed());
    assert!(outcome.folder.is_committed());
    let state = h.manager.snapshot();
    assert!(state.bookmarks.is_empty());
    assert_eq!(state.folders, vec!["Work"]);
}

#[tokio::test]
async fn test_create_same_folder_twice() {
    let h = loaded_harness().await;

    assert!(h.manager.create_folder("Reading").await.is_committed());
    assert!(h.manager.create_folder(" Reading ").await.is_skipped());

    assert_eq!(h.manager.snapshot().folders, vec!["Reading"]);
    assert_eq!(h.store.count(Collection::Folders, "u1").await, 1);
}

#[tokio::test]
async fn test_blank_folder_and_tag_names_fail() {
    let h = loaded_harness().await;
    assert!(matches!(
        h.manager.create_folder("   ").await.error(),
        Some(LibraryError::Input(InputError::EmptyFolderName))
    ));
    assert!(matches!(
        h.manager.create_tag("").await.error(),
        Some(LibraryError::Input(InputError::EmptyTagName))
    ));
}

#[tokio::test]
async fn test_create_tag_then_skip_duplicate() {
    let h = loaded_harness().await;
    assert!(h.manager.create_tag("rust").await.is_committed());
    assert!(h.manager.create_tag("rust").await.is_skipped());
    assert_eq!(h.manager.snapshot().tags, vec!["rust"]);
}

// ─── Delete ───

#[tokio::test]
async fn test_delete_folder_clears_bookmark_folders() {
    let h = loaded_harness().await;
    h.manager.create_bookmark(input("A", "https://a.dev", "Work", &[])).await;
    h.manager.create_bookmark(input("B", "https://b.dev", "Work", &[])).await;
    h.manager.create_bookmark(input("C", "https://c.dev", "Home", &[])).await;

    assert!(h.manager.delete_folder("Work").await.is_committed());

    let state = h.manager.snapshot();
    assert_eq!(state.folders, vec!["Home"]);
    assert_eq!(state.bookmarks.len(), 3);
    for bookmark in &state.bookmarks {
        match bookmark.title.as_str() {
            "C" => assert_eq!(bookmark.folder.as_deref(), Some("Home")),
            _ => assert_eq!(bookmark.folder, None),
        }
    }
    assert_eq!(h.store.count(Collection::Folders, "u1").await, 1);
}

#[tokio::test]
async fn test_delete_tag_strips_it_from_bookmarks() {
    let h = loaded_harness().await;
    h.manager
        .create_bookmark(input("A", "https://a.dev", "", &["react", "frontend"]))
        .await;
    h.manager.create_bookmark(input("B", "https://b.dev", "", &["react"])).await;

    assert!(h.manager.delete_tag("react").await.is_committed());

    let state = h.manager.snapshot();
    assert_eq!(state.tags, vec!["frontend"]);
    let a = state.bookmarks.iter().find(|b| b.title == "A").unwrap();
    let b = state.bookmarks.iter().find(|b| b.title == "B").unwrap();
    assert_eq!(a.tags, vec!["frontend"]);
    assert!(b.tags.is_empty());
}

#[tokio::test]
async fn test_failed_delete_leaves_state_unchanged() {
    let h = loaded_harness().await;
    h.manager.create_bookmark(input("A", "https://a.dev", "Work", &["rust"])).await;
    let before = h.manager.snapshot();
    h.store.fail_on(Some(Collection::Folders));

    let outcome = h.manager.delete_folder("Work").await;

    assert!(outcome.is_failed());
    assert_eq!(h.manager.snapshot(), before);
}

#[tokio::test]
async fn test_concurrent_bookmark_deletes() {
    let h = loaded_harness().await;
    let a = h
        .manager
        .create_bookmark(input("A", "https://a.dev", "", &[]))
        .await
        .bookmark
        .committed()
        .unwrap()
        .id
        .clone();
    let b = h
        .manager
        .create_bookmark(input("B", "https://b.dev", "", &[]))
        .await
        .bookmark
        .committed()
        .unwrap()
        .id
        .clone();

    let other = h.manager.clone();
    let (first, second) = tokio::join!(h.manager.delete_bookmark(&a), other.delete_bookmark(&b));

    assert!(first.is_committed());
    assert!(second.is_committed());
    assert!(h.manager.snapshot().bookmarks.is_empty());
    assert_eq!(h.store.count(Collection::Bookmarks, "u1").await, 0);
}

// ─── Notices ───

#[tokio::test]
async fn test_mutation_emits_pending_then_success() {
    let h = loaded_harness().await;
    h.manager.create_folder("Work").await;

    let notices = h.notices.drain();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Pending);
    assert_eq!(notices[0].message, "Adding folder...");
    assert_eq!(notices[1].level, NoticeLevel::Success);
    assert_eq!(notices[1].message, "Folder added successfully");
    assert!(h.notices.notices().is_empty());
}

#[tokio::test]
async fn test_skipped_mutation_is_silent() {
    let h = loaded_harness().await;
    h.manager.create_tag("rust").await;
    h.notices.drain();

    h.manager.create_tag("rust").await;
    assert!(h.notices.drain().is_empty());
}

// ─── View and query ───

#[tokio::test]
async fn test_view_applies_current_query() {
    let h = loaded_harness().await;
    h.manager.create_bookmark(input("Zeta", "https://z.dev", "Work", &["x"])).await;
    h.manager.create_bookmark(input("Alpha", "https://a.dev", "Home", &["x"])).await;

    h.manager.set_sort(SortKey::TitleAsc);
    let titles: Vec<String> = h.manager.view().bookmarks().iter().map(|b| b.title.clone()).collect();
    assert_eq!(titles, vec!["Alpha", "Zeta"]);

    h.manager.select_folder(FolderFilter::Named("Work".to_string()));
    assert_eq!(h.manager.view().bookmarks().len(), 1);

    h.manager.select_folder(FolderFilter::All);
    h.manager.set_search("ALPHA");
    assert_eq!(h.manager.view().bookmarks()[0].title, "Alpha");
}

#[tokio::test]
async fn test_toggle_tag_selection() {
    let h = loaded_harness().await;
    h.manager.toggle_tag("react");
    assert_eq!(h.manager.query().tag.as_deref(), Some("react"));
    h.manager.toggle_tag("react");
    assert_eq!(h.manager.query().tag, None);

    h.manager.select_tag(Some("design".to_string()));
    h.manager.set_query(BookmarkQuery::default());
    assert_eq!(h.manager.query(), BookmarkQuery::default());
}

#[tokio::test]
async fn test_clear_returns_to_loading() {
    let h = loaded_harness().await;
    h.manager.create_folder("Work").await;
    h.manager.clear();
    assert!(h.manager.view().is_loading());
    assert!(h.manager.snapshot().folders.is_empty());
}
