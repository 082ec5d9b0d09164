//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::AGENT_NOT_INITIALIZED;
use crate::state::AppState;

/// GET /health — 200 when the agent is ready, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.agent.is_some() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "message": "Chatbot agent is initialized.",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": AGENT_NOT_INITIALIZED,
            })),
        )
    }
}
