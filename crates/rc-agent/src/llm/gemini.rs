//! Gemini `generateContent` client.
//!
//! Every exchange is one POST with the whole prompt as a single user turn.
//! Failures are logged and folded into the "no result" outcome of each
//! operation rather than returned.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LanguageModel, parse_selection, prompts};
use crate::error::LlmError;
use rc_protocol::{ToolCall, ToolCallError};

/// Returned by `fallback` when Gemini cannot be reached.
pub const FALLBACK_APOLOGY: &str = "I'm sorry, I can only answer questions about the Ozone Recon cluster data. Please ask about containers, keys, datanodes, pipelines, or cluster state.";

/// Configuration for the Gemini API.
#[derive(Clone, Deserialize)]
pub struct GeminiConfig {
    /// API key, sent as `x-goog-api-key`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model to use. A `models/` prefix is accepted.
    #[serde(default = "default_model")]
    pub model: String,
    /// Generative Language API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. None waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// `generateContent` response (only fields we need).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Client for the Gemini Generative Language API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: &str) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(LlmError::Client)?;

        let model = config
            .model
            .trim()
            .trim_start_matches("models/")
            .to_string();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            model
        );

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model,
            url,
        })
    }

    /// Send one prompt and return the trimmed text of the first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn select_endpoint(
        &self,
        query: &str,
        schema: &str,
        guide: &str,
    ) -> Result<Option<ToolCall>, ToolCallError> {
        let prompt = prompts::selection(query, schema, guide);
        match self.generate(&prompt).await {
            Ok(raw) => parse_selection(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "endpoint selection failed");
                Ok(None)
            }
        }
    }

    async fn summarize(&self, query: &str, response: &serde_json::Value, endpoint: &str) -> String {
        let prompt = prompts::summary(query, response, endpoint);
        match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, endpoint, "summarization failed");
                format!("I encountered an error while analyzing the data: {e}")
            }
        }
    }

    async fn fallback(&self, query: &str) -> String {
        match self.generate(&prompts::fallback(query)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "fallback generation failed");
                FALLBACK_APOLOGY.to_string()
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
