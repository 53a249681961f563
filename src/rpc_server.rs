//! BloomBook RPC Server: JSON-RPC over stdin/stdout for the UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.create", "params":{"title":"...","url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so stdout carries protocol lines only.

use bloombook::app::App;
use bloombook::rpc_handler::handle_method;
use bloombook::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use bloombook::types::errors::AppError;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable pointing at an alternate settings file.
const CONFIG_ENV: &str = "BLOOMBOOK_CONFIG";

async fn send(stdout: &mut Stdout, message: &Value) -> Result<(), AppError> {
    let mut line = message.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let mut engine = SettingsEngine::new(std::env::var(CONFIG_ENV).ok());
    let settings = engine.load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let db_path = engine.database_path();
    info!(config = engine.get_config_path(), db = %db_path.display(), "starting BloomBook");
    let app = App::open(&db_path, &settings)?;
    let startup = app.startup().await;
    if let Some(err) = startup.error() {
        warn!(error = %err, "initial library load failed");
    }

    let mut stdout = io::stdout();
    send(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                send(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        send(&mut stdout, &response).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
