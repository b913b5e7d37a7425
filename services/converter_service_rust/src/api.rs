//! HTTP surface: `POST /api/convert` and `GET /api/health`.
//!
//! Conversions always answer 200 with a `ConversionResult`; failures are
//! reported through `ok`/`message`, including malformed bodies and panics
//! inside the pipeline.

use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use slipbridge_rust_core::{ConversionRequest, ConversionResult};
use tracing::{error, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/convert", post(convert))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConversionRequest>, JsonRejection>,
) -> Json<ConversionResult> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected convert request: {}", rejection.body_text());
            return Json(ConversionResult::failure(format!(
                "Invalid request: {}",
                rejection.body_text()
            )));
        }
    };

    // Run detached so a client disconnect does not abort an in-flight fetch
    let orchestrator = state.orchestrator.clone();
    let task = tokio::spawn(async move { orchestrator.convert(&request).await });

    match task.await {
        Ok(result) => Json(result),
        Err(e) => {
            error!("Conversion task failed: {}", e);
            Json(ConversionResult::failure(
                "Internal error while converting. Please try again.",
            ))
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
