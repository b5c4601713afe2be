//! Profile ingestion HTTP server.
//!
//! Exposes the upsert pipeline via a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/profiles` | Upsert a raw profile payload |
//! | `GET`  | `/profiles/{id}` | Fetch a stored record's metadata |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "malformed_profile", "message": "profileId is missing" } }
//! ```
//!
//! Error codes: `malformed_profile` (400), `not_found` (404),
//! `store_unavailable` (500), `embedding_failure` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! dashboards posting profiles cross-origin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::embedding::{create_embedder, Embedder};
use crate::ingest::{self, IngestError};
use crate::store::chroma::ChromaStore;
use crate::store::ProfileStore;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    store: Arc<dyn ProfileStore>,
    embedder: Arc<dyn Embedder>,
}

/// Starts the ingestion HTTP server.
///
/// Connects to Chroma, creates the embedding provider, binds to the address
/// configured in `[server].bind`, and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = ChromaStore::connect(&config.store).await?;
    let embedder = create_embedder(&config.embedding)?;

    let state = AppState {
        store: Arc::new(store),
        embedder: Arc::from(embedder),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/profiles", post(handle_upsert))
        .route("/profiles/{id}", get(handle_get_profile))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("Profile Index server listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn store_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "store_unavailable".to_string(),
        message: message.into(),
    }
}

/// Map ingestion failures to HTTP responses: malformed input is the caller's
/// fault, everything else is a server-side failure.
fn classify_ingest_error(err: IngestError) -> AppError {
    match err {
        IngestError::MalformedProfile(msg) => AppError {
            status: StatusCode::BAD_REQUEST,
            code: "malformed_profile".to_string(),
            message: msg,
        },
        IngestError::Store(e) => store_error(e.to_string()),
        IngestError::Embedding(e) => AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "embedding_failure".to_string(),
            message: e.to_string(),
        },
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /profiles ============

/// Handler for `POST /profiles`.
///
/// Accepts a raw profile JSON body and runs the upsert pipeline. Returns the
/// document id and the action taken (`inserted`, `updated`, or `skipped`).
async fn handle_upsert(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let receipt = ingest::upsert_profile(state.store.as_ref(), state.embedder.as_ref(), &raw)
        .await
        .map_err(classify_ingest_error)?;

    Ok(Json(serde_json::json!({
        "profile_id": receipt.profile_id,
        "action": receipt.action.as_str(),
    })))
}

// ============ GET /profiles/{id} ============

/// Handler for `GET /profiles/{id}`.
///
/// Returns the stored record's metadata, or 404 if the id is not indexed.
async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .store
        .get(&id)
        .await
        .map_err(|e| store_error(e.to_string()))?
        .ok_or_else(|| not_found(format!("no profile indexed with id: {}", id)))?;

    Ok(Json(serde_json::json!({
        "profile_id": record.id,
        "metadata": record.metadata,
    })))
}
