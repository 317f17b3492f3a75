//! Axum router for the data provider.
//!
//! One read endpoint plus the static flag assets:
//!
//! - `GET /population` -- the stored dataset object, `{}` when the store is
//!   empty, or a generic 500 on any store fault
//! - `GET /flags/{id}.svg` -- static files from the flags directory
//!
//! CORS is open so the chart client can run from anywhere during
//! development.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::store::{DocStore, StoreError};

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: DocStore,
}

/// Faults the provider can surface. Whatever the cause, the wire response
/// is a fixed generic 500; detail goes to the log only.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("storage fault: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(e) => error!("population fetch failed: {e}"),
        }
        let body = serde_json::json!({ "message": "Internal Server Error" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Build the complete router for the provider.
pub fn build_router(state: Arc<AppState>, flags_dir: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/population", get(get_population))
        .nest_service("/flags", ServeDir::new(flags_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /population` -- the entire dataset in one response.
async fn get_population(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ProviderError> {
    match state.store.fetch_population()? {
        Some(fields) => Ok(Json(Value::Object(fields))),
        None => {
            info!("no population document in store");
            Ok(Json(Value::Object(serde_json::Map::new())))
        }
    }
}
