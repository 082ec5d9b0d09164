//! Shared application state for the Axum server.

use std::sync::Arc;

use rc_agent::{ChatAgent, ChatbotConfig};

/// Built once at startup and cloned into every handler.
///
/// `agent` is `None` when initialization failed (e.g. no API key); the
/// server still runs so `/health` can report it.
#[derive(Clone, Default)]
pub struct AppState {
    pub agent: Option<Arc<ChatAgent>>,
}

impl AppState {
    pub fn new(agent: ChatAgent) -> Self {
        Self {
            agent: Some(Arc::new(agent)),
        }
    }

    /// State with no agent.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Try to build the agent; log and stay uninitialized on failure.
    pub fn from_config(config: &ChatbotConfig) -> Self {
        match ChatAgent::from_config(config) {
            Ok(agent) => {
                tracing::info!("chatbot agent initialized");
                Self::new(agent)
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to initialize chatbot agent");
                Self::uninitialized()
            }
        }
    }
}
