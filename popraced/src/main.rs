//! Population data daemon.
//!
//! Serves the population dataset to chart clients:
//! - single-document JSON store (the canonical dataset)
//! - `GET /population` retrieval endpoint
//! - static flag SVGs under `/flags/`
//!
//! Storage locations:
//! - Linux: ~/.local/share/poprace/
//! - Windows: %APPDATA%\poprace\
//! - MacOS: ~/Library/Application Support/poprace/

use std::path::PathBuf;
use std::sync::Arc;

use poprace::dataset::YearlyDataset;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod paths;
mod routes;
mod store;

use paths::AppPaths;
use routes::{build_router, AppState};
use store::DocStore;

#[derive(Debug, Clone)]
struct DaemonConfig {
    listen: String,
    data_path: PathBuf,
    flags_dir: PathBuf,
}

impl DaemonConfig {
    fn from_env_and_args(paths: &AppPaths) -> Self {
        let mut listen = std::env::var("POPRACE_LISTEN")
            .unwrap_or_else(|_| "127.0.0.1:4310".to_string());
        let mut data_path = std::env::var("POPRACE_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| paths.population_file());
        let mut flags_dir = std::env::var("POPRACE_FLAGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| paths.flags_dir());

        let mut args = std::env::args().skip(1);
        while let Some(a) = args.next() {
            match a.as_str() {
                "--listen" => {
                    if let Some(v) = args.next() {
                        listen = v;
                    }
                }
                "--data" => {
                    if let Some(v) = args.next() {
                        data_path = PathBuf::from(v);
                    }
                }
                "--flags-dir" => {
                    if let Some(v) = args.next() {
                        flags_dir = PathBuf::from(v);
                    }
                }
                _ => {}
            }
        }

        Self {
            listen,
            data_path,
            flags_dir,
        }
    }
}

/// Log what the store currently holds so a bad deployment shows up at
/// startup rather than in the first client session.
fn log_store_contents(store: &DocStore) {
    match store.fetch_population() {
        Ok(Some(fields)) => {
            match serde_json::from_value::<YearlyDataset>(serde_json::Value::Object(
                fields,
            )) {
                Ok(data) => info!(
                    years = data.year_count(),
                    "population document loaded from {:?}",
                    store.path()
                ),
                Err(e) => warn!("population document does not parse as a dataset: {e}"),
            }
        }
        Ok(None) => warn!("store is empty; /population will serve {{}}"),
        Err(e) => warn!("could not read population document: {e}"),
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C: shutting down");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Setup application paths
    let paths = AppPaths::new()?;
    info!("Data directory: {:?}", paths.data_dir());

    let cfg = DaemonConfig::from_env_and_args(&paths);
    info!("Population document: {:?}", cfg.data_path);
    info!("Flags directory: {:?}", cfg.flags_dir);

    let store = DocStore::open(&cfg.data_path);
    log_store_contents(&store);

    let state = Arc::new(AppState { store });
    let router = build_router(state, cfg.flags_dir.clone());

    let listener = TcpListener::bind(&cfg.listen).await?;
    info!("poprace daemon listening on {}", cfg.listen);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
