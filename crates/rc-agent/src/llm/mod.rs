//! Language-model side of the query pipeline.
//!
//! Three independent exchanges, each a single request/response with no
//! retry:
//! - **select_endpoint**: pick a Recon endpoint (or answer from the guide).
//! - **summarize**: turn raw Recon JSON into a prose answer.
//! - **fallback**: politely explain what the bot can and cannot answer.

pub mod extract;
pub mod gemini;
pub mod prompts;

use async_trait::async_trait;
use rc_protocol::{ToolCall, ToolCallError};

pub use gemini::{GeminiClient, GeminiConfig};

/// Literal the model emits when no endpoint or documentation fits.
pub const NO_ENDPOINT_SENTINEL: &str = "NO_SUITABLE_ENDPOINT";

/// A text-generation model able to drive the chatbot.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Ask the model which endpoint answers `query`.
    ///
    /// `Ok(None)` means "no suitable endpoint"; transport and parse failures
    /// also land there. `Err` is reserved for a JSON object that was found
    /// but is not a usable tool call.
    async fn select_endpoint(
        &self,
        query: &str,
        schema: &str,
        guide: &str,
    ) -> Result<Option<ToolCall>, ToolCallError>;

    /// Summarize `response` for the user. Failures come back as text.
    async fn summarize(&self, query: &str, response: &serde_json::Value, endpoint: &str) -> String;

    /// Scope-limit explanation for queries no endpoint can answer.
    async fn fallback(&self, query: &str) -> String;

    /// Model name (for logging).
    fn model_name(&self) -> &str;
}

/// Interpret the raw text of a selection reply.
///
/// The sentinel wins over any JSON in the same reply. Otherwise the first
/// balanced `{...}` span is decoded; no span or invalid JSON means `None`.
pub fn parse_selection(raw: &str) -> Result<Option<ToolCall>, ToolCallError> {
    if raw.contains(NO_ENDPOINT_SENTINEL) {
        return Ok(None);
    }

    let Some(span) = extract::first_json_object(raw) else {
        tracing::debug!(response = %raw, "no JSON object in selection reply");
        return Ok(None);
    };

    let value: serde_json::Value = match serde_json::from_str(span) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, span = %span, "selection reply contains invalid JSON");
            return Ok(None);
        }
    };

    ToolCall::from_json(&value).map(Some)
}
