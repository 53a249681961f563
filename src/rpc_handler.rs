//! RPC method handler for the BloomBook JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` maps each UI action to a call on the `App` and encodes the
//! result as JSON.
//!
//! Malformed requests are answered with `Err`. A mutation that was attempted
//! and failed is still `Ok`: its outcome reports `"status": "failed"` and the
//! error message, alongside the error notice queued for `notices.drain`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::library_manager::LibraryManagerTrait;
use crate::services::identity::IdentityProvider;
use crate::types::bookmark::{parse_tag_list, BookmarkInput};
use crate::types::library::{CreateBookmarkOutcome, MutationOutcome};
use crate::types::query::{FolderFilter, SortKey};

/// Encodes an outcome as `{"status": ..., "value"?: ..., "error"?: ...}`.
///
/// A committed value that fails to serialize is an RPC error, not a bare
/// `"committed"`.
pub fn outcome_to_json<T: Serialize>(outcome: &MutationOutcome<T>) -> Result<Value, String> {
    Ok(match outcome {
        MutationOutcome::Committed(value) => {
            let value = serde_json::to_value(value).map_err(|e| e.to_string())?;
            if value.is_null() {
                json!({"status": "committed"})
            } else {
                json!({"status": "committed", "value": value})
            }
        }
        MutationOutcome::Skipped => json!({"status": "skipped"}),
        MutationOutcome::Failed(err) => json!({"status": "failed", "error": err.to_string()}),
    })
}

fn create_outcome_to_json(outcome: &CreateBookmarkOutcome) -> Result<Value, String> {
    let tags = outcome
        .tags
        .iter()
        .map(|(name, result)| {
            let mut entry = outcome_to_json(result)?;
            entry["name"] = json!(name);
            Ok(entry)
        })
        .collect::<Result<Vec<Value>, String>>()?;
    Ok(json!({
        "bookmark": outcome_to_json(&outcome.bookmark)?,
        "folder": outcome_to_json(&outcome.folder)?,
        "tags": tags,
    }))
}

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn opt_str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Tags arrive either as an array of names or as the raw comma-separated text
/// typed into the form.
fn tags_param(params: &Value) -> Result<Vec<String>, String> {
    match params.get("tags") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(parse_tag_list(raw)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| "invalid tags: expected strings".to_string())
            })
            .collect(),
        Some(_) => Err("invalid tags: expected a string or an array".to_string()),
    }
}

fn sort_param(raw: &str) -> Result<SortKey, String> {
    serde_json::from_value(json!(raw)).map_err(|_| format!("invalid sort: {}", raw))
}

fn view_json(app: &App) -> Result<Value, String> {
    serde_json::to_value(app.library.view()).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Session ───
        "session.sign_in" => {
            let owner = str_param(params, "owner")?.trim();
            if owner.is_empty() {
                return Err("missing owner".to_string());
            }
            outcome_to_json(&app.sign_in(owner).await)
        }
        "session.sign_out" => {
            app.sign_out();
            Ok(json!({"ok": true}))
        }
        "session.current" => Ok(json!({"owner": app.identity.current_owner()})),

        // ─── Library ───
        "library.load" => outcome_to_json(&app.library.load().await),
        "library.view" => view_json(app),
        "library.snapshot" => serde_json::to_value(app.library.snapshot()).map_err(|e| e.to_string()),
        "library.query" => {
            // Only the keys present are changed; `"folder": null` selects all folders.
            let mut query = app.library.query();
            if let Some(search) = params.get("search") {
                query.search = search.as_str().unwrap_or_default().to_string();
            }
            if let Some(folder) = params.get("folder") {
                query.folder = FolderFilter::from(folder.as_str().map(str::to_string));
            }
            if let Some(tag) = params.get("tag") {
                query.tag = tag.as_str().map(str::to_string);
            }
            if let Some(sort) = opt_str_param(params, "sort") {
                query.sort = sort_param(sort)?;
            }
            app.library.set_query(query);
            if let Some(tag) = opt_str_param(params, "toggle_tag") {
                app.library.toggle_tag(tag);
            }
            Ok(json!({
                "query": app.library.query(),
                "view": view_json(app)?,
            }))
        }

        // ─── Bookmarks ───
        "bookmark.create" => {
            let input = BookmarkInput {
                title: str_param(params, "title")?.to_string(),
                url: str_param(params, "url")?.to_string(),
                description: opt_str_param(params, "description").unwrap_or_default().to_string(),
                folder: opt_str_param(params, "folder").unwrap_or_default().to_string(),
                tags: tags_param(params)?,
            };
            let outcome = app.library.create_bookmark(input).await;
            create_outcome_to_json(&outcome)
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            outcome_to_json(&app.library.delete_bookmark(id).await)
        }

        // ─── Folders ───
        "folder.create" => {
            let name = str_param(params, "name")?;
            outcome_to_json(&app.library.create_folder(name).await)
        }
        "folder.delete" => {
            let name = str_param(params, "name")?;
            outcome_to_json(&app.library.delete_folder(name).await)
        }
        "folder.list" => Ok(json!(app.library.snapshot().folders)),

        // ─── Tags ───
        "tag.create" => {
            let name = str_param(params, "name")?;
            outcome_to_json(&app.library.create_tag(name).await)
        }
        "tag.delete" => {
            let name = str_param(params, "name")?;
            outcome_to_json(&app.library.delete_tag(name).await)
        }
        "tag.list" => Ok(json!(app.library.snapshot().tags)),

        // ─── Notices ───
        "notices.drain" => Ok(json!(app.notices.drain())),

        _ => Err(format!("unknown method: {}", method)),
    }
}
