//! BloomBook persistence boundary.
//!
//! [`client::StoreClient`] is the only code that talks to a
//! [`document_store::DocumentStore`]; it translates between domain types and
//! the stored record shapes in [`records`].

pub mod client;
pub mod document_store;
pub mod records;
pub mod schema;
pub mod sqlite_store;

pub use client::StoreClient;
pub use document_store::{DocumentStore, Filter};
pub use schema::Collection;
pub use sqlite_store::SqliteDocumentStore;
