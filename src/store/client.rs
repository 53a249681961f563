//! Store client: owner-scoped create/find/delete calls for bookmarks,
//! folders and tags.
//!
//! Every call first resolves the owner from the identity provider and fails
//! with [`StoreError::Authentication`] without touching the store if there is
//! none. Store failures are wrapped with a prefix naming the operation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::document_store::{DocumentStore, Filter, ID_FIELD};
use super::records::{
    from_document, to_document, BookmarkRecord, NamedRecord, NewBookmarkRecord, NewNamedRecord,
};
use super::schema::Collection;
use crate::services::identity::IdentityProvider;
use crate::types::bookmark::{Bookmark, BookmarkInput, Folder, Tag};
use crate::types::errors::{DocumentStoreError, StoreError};

#[derive(Clone)]
pub struct StoreClient {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl StoreClient {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    fn owner(&self) -> Result<String, StoreError> {
        self.identity.current_owner().ok_or(StoreError::Authentication)
    }

    fn decode_all<R, T>(docs: Vec<Value>) -> Result<Vec<T>, DocumentStoreError>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        docs.into_iter()
            .map(|doc| from_document::<R>(doc).map(T::from))
            .collect()
    }

    async fn find_owned<R, T>(&self, collection: Collection, owner: &str) -> Result<Vec<T>, DocumentStoreError>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        let docs = self.store.find(collection, &Filter::owned_by(owner)).await?;
        Self::decode_all::<R, T>(docs)
    }

    // ─── Bookmarks ───

    pub async fn get_user_bookmarks(&self) -> Result<Vec<Bookmark>, StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, "fetching bookmarks");
        self.find_owned::<BookmarkRecord, Bookmark>(Collection::Bookmarks, &owner)
            .await
            .map_err(|e| StoreError::operation("Error fetching bookmarks", e))
    }

    pub async fn create_bookmark(&self, input: &BookmarkInput) -> Result<Bookmark, StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, url = %input.url, "creating bookmark");
        let wrap = |e: DocumentStoreError| StoreError::operation("Error creating bookmark", e);
        let data = to_document(&NewBookmarkRecord::from_input(input, &owner)).map_err(wrap)?;
        let doc = self.store.create(Collection::Bookmarks, data).await.map_err(wrap)?;
        let record: BookmarkRecord = from_document(doc).map_err(wrap)?;
        Ok(record.into())
    }

    pub async fn delete_bookmark(&self, id: &str) -> Result<(), StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, id, "deleting bookmark");
        let filter = Filter::owned_by(&owner).eq(ID_FIELD, id);
        self.store
            .delete(Collection::Bookmarks, &filter)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::operation("Error deleting bookmark", e))
    }

    // ─── Folders ───

    pub async fn get_user_folders(&self) -> Result<Vec<Folder>, StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, "fetching folders");
        self.find_owned::<NamedRecord, Folder>(Collection::Folders, &owner)
            .await
            .map_err(|e| StoreError::operation("Error fetching folders", e))
    }

    pub async fn create_folder(&self, name: &str) -> Result<Folder, StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, name, "creating folder");
        self.create_named(Collection::Folders, name, &owner)
            .await
            .map(Folder::from)
            .map_err(|e| StoreError::operation("Error creating folder", e))
    }

    pub async fn delete_folder_by_name(&self, name: &str) -> Result<(), StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, name, "deleting folder");
        self.delete_named(Collection::Folders, name, &owner)
            .await
            .map_err(|e| StoreError::operation("Error deleting folder", e))
    }

    // ─── Tags ───

    pub async fn get_user_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, "fetching tags");
        self.find_owned::<NamedRecord, Tag>(Collection::Tags, &owner)
            .await
            .map_err(|e| StoreError::operation("Error fetching tags", e))
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag, StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, name, "creating tag");
        self.create_named(Collection::Tags, name, &owner)
            .await
            .map(Tag::from)
            .map_err(|e| StoreError::operation("Error creating tag", e))
    }

    pub async fn delete_tag_by_name(&self, name: &str) -> Result<(), StoreError> {
        let owner = self.owner()?;
        debug!(owner = %owner, name, "deleting tag");
        self.delete_named(Collection::Tags, name, &owner)
            .await
            .map_err(|e| StoreError::operation("Error deleting tag", e))
    }

    async fn create_named(
        &self,
        collection: Collection,
        name: &str,
        owner: &str,
    ) -> Result<NamedRecord, DocumentStoreError> {
        let data = to_document(&NewNamedRecord { name, user_id: owner })?;
        let doc = self.store.create(collection, data).await?;
        from_document(doc)
    }

    async fn delete_named(&self, collection: Collection, name: &str, owner: &str) -> Result<(), DocumentStoreError> {
        let filter = Filter::owned_by(owner).eq("name", name);
        self.store.delete(collection, &filter).await.map(|_| ())
    }
}
