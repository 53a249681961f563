//! SQLite-backed [`DocumentStore`].
//!
//! Every record lives in the `documents` table as a JSON body tagged with its
//! collection slug and owner. Identifiers are UUID v4; timestamps are RFC 3339
//! UTC with millisecond precision.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::document_store::{DocumentStore, Filter, ID_FIELD, OWNER_FIELD};
use super::schema::{Collection, FieldKind};
use crate::database::Database;
use crate::types::errors::DocumentStoreError;

/// Document store over a single SQLite database.
pub struct SqliteDocumentStore {
    db: Mutex<Database>,
}

impl SqliteDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens (or creates) the database file and runs migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, DocumentStoreError> {
        self.db
            .lock()
            .map_err(|e| DocumentStoreError::Database(format!("connection lock poisoned: {}", e)))
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Gives every array row without an `id` a fresh one.
    fn assign_row_ids(collection: Collection, body: &mut Map<String, Value>) {
        for spec in collection.schema().fields {
            if !matches!(spec.kind, FieldKind::Array(_)) {
                continue;
            }
            if let Some(Value::Array(rows)) = body.get_mut(spec.name) {
                for row in rows.iter_mut().filter_map(Value::as_object_mut) {
                    let missing = matches!(row.get(ID_FIELD), None | Some(Value::Null));
                    if missing {
                        row.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
                    }
                }
            }
        }
    }

    fn insert(conn: &Connection, collection: Collection, data: Value) -> Result<Value, DocumentStoreError> {
        collection.schema().validate(&data)?;

        let Value::Object(mut body) = data else {
            return Err(DocumentStoreError::Validation {
                collection: collection.slug().to_string(),
                message: "expected an object".to_string(),
            });
        };

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        Self::assign_row_ids(collection, &mut body);
        body.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        body.insert("createdAt".to_string(), Value::String(now.clone()));
        body.insert("updatedAt".to_string(), Value::String(now.clone()));

        let owner = body.get(OWNER_FIELD).and_then(Value::as_str).map(str::to_string);
        let doc = Value::Object(body);
        let encoded = serde_json::to_string(&doc)?;

        conn.execute(
            "INSERT INTO documents (id, collection, owner_id, body, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, collection.slug(), owner, encoded, now, now],
        )?;

        Ok(doc)
    }

    /// Loads candidate rows, narrowing by owner in SQL when the filter allows,
    /// then applies the full filter to the decoded bodies.
    fn select(conn: &Connection, collection: Collection, filter: &Filter) -> Result<Vec<Value>, DocumentStoreError> {
        let bodies: Vec<String> = match filter.string_value(OWNER_FIELD) {
            Some(owner) => {
                let mut stmt = conn.prepare(
                    "SELECT body FROM documents WHERE collection = ?1 AND owner_id = ?2 ORDER BY rowid",
                )?;
                let rows = stmt.query_map(params![collection.slug(), owner], |row| row.get(0))?;
                rows.collect::<Result<_, _>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY rowid")?;
                let rows = stmt.query_map(params![collection.slug()], |row| row.get(0))?;
                rows.collect::<Result<_, _>>()?
            }
        };

        let mut results = Vec::new();
        for body in bodies {
            let doc: Value = serde_json::from_str(&body)?;
            if filter.matches(&doc) {
                results.push(doc);
            }
        }
        Ok(results)
    }

    fn remove(conn: &Connection, collection: Collection, filter: &Filter) -> Result<usize, DocumentStoreError> {
        if filter.is_empty() {
            return Err(DocumentStoreError::Validation {
                collection: collection.slug().to_string(),
                message: "refusing to delete without a filter".to_string(),
            });
        }

        let matching = Self::select(conn, collection, filter)?;
        let tx = conn.unchecked_transaction()?;
        let mut removed = 0;
        for doc in &matching {
            if let Some(id) = doc.get(ID_FIELD).and_then(Value::as_str) {
                removed += tx.execute(
                    "DELETE FROM documents WHERE id = ?1 AND collection = ?2",
                    params![id, collection.slug()],
                )?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create(&self, collection: Collection, data: Value) -> Result<Value, DocumentStoreError> {
        let db = self.lock()?;
        Self::insert(db.connection(), collection, data)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, DocumentStoreError> {
        let db = self.lock()?;
        Self::select(db.connection(), collection, filter)
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize, DocumentStoreError> {
        let db = self.lock()?;
        Self::remove(db.connection(), collection, filter)
    }
}
