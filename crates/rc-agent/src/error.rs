//! Error types for the chatbot agent.

use std::path::PathBuf;

use rc_protocol::ToolCallError;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// API schema loading errors. The guide never produces one.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("API schema file not found at {0}")]
    SchemaNotFound(PathBuf),

    #[error("error loading API schema {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures talking to the Gemini API. Never escapes the LLM client's
/// public operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("gemini request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gemini returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("gemini returned no text")]
    EmptyResponse,
}

/// Failures talking to the Recon REST API.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to Recon failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Recon returned HTTP {status} for {endpoint}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: String,
    },

    #[error("Recon returned invalid JSON for {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

/// Anything that aborts the query pipeline after endpoint selection.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid tool call: {0}")]
    InvalidToolCall(#[from] ToolCallError),

    #[error(transparent)]
    Recon(#[from] ReconError),
}
