//! Chat endpoint used by the Recon web UI.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AGENT_NOT_INITIALIZED;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for a chat query.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Natural-language question.
    #[serde(default)]
    pub query: Option<String>,
}

/// Response body for a chat query.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /chat — answer one question.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Some(agent) = state.agent.as_ref() else {
        return Err(ApiError::Internal(AGENT_NOT_INITIALIZED.into()));
    };

    let query = match payload {
        Ok(Json(req)) => req.query.filter(|q| !q.trim().is_empty()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected chat body");
            None
        }
    }
    .ok_or_else(|| ApiError::BadRequest("Query field is missing.".into()))?;

    let request_id = Uuid::now_v7();
    tracing::info!(%request_id, query = %query, "received chat query");

    let response = agent.process_query(&query).await;

    tracing::info!(%request_id, response_len = response.len(), "sending chat response");
    Ok(Json(ChatResponse { response }))
}
