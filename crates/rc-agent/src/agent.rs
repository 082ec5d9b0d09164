//! Query orchestration.
//!
//! One query runs at most three remote exchanges, strictly in order:
//! 1. ask the model which endpoint answers the question,
//! 2. GET that endpoint from Recon,
//! 3. ask the model to summarize the JSON it returned.
//!
//! Every failure ends up as user-facing text; nothing is raised to callers.

use std::sync::Arc;

use anyhow::Context;

use crate::config::ChatbotConfig;
use crate::docs::ApiDocs;
use crate::error::AgentError;
use crate::llm::{GeminiClient, LanguageModel};
use crate::recon::{MonitoringApi, ReconClient};
use rc_protocol::{ConnectionReport, ConnectionStatus, ToolCall};

/// Returned when the API schema is empty.
pub const SCHEMA_NOT_LOADED: &str = "Error: API schema not loaded. Please check the configuration.";

/// Returned for a documentation answer the model left blank.
pub const DOCUMENTATION_UNAVAILABLE: &str = "Documentation information not available.";

/// Prefix of every pipeline failure message.
pub const ERROR_PREFIX: &str = "I encountered an error while processing your request:";

/// Query used to check that the model answers at all.
const CONNECTION_TEST_QUERY: &str = "test connection";

const CAPABILITIES: &str = r#"I can help you get information about your Ozone Recon cluster. Here's what I can assist with:

**Container Information:**
- Unhealthy containers (missing, under-replicated, over-replicated, mis-replicated)
- Missing containers
- Deleted containers
- Container replica history

**Keys and Storage:**
- Open keys and their summaries
- Keys pending deletion
- Blocks pending deletion
- Keys within specific containers

**Cluster Overview:**
- Overall cluster state and health
- Datanode information and status
- Pipeline information
- Task status and background processes

**Storage Utilization:**
- File count utilization by size
- Container count utilization by size

**Namespace Information:**
- Path summaries and metadata
- Disk usage for specific paths
- Quota information for volumes and buckets
- File size distribution

**Volumes and Buckets:**
- List all volumes
- List all buckets (optionally filtered by volume)

**Metrics:**
- Prometheus metrics queries

Just ask me questions in natural language like:
- "How many unhealthy containers are there?"
- "Show me the open keys summary"
- "What's the cluster state?"
- "List all datanodes"
- "What's the disk usage for /vol1/bucket1?"

I'll analyze your question and fetch the relevant data from your Recon service."#;

/// The chatbot: API docs plus handles to the model and to Recon.
///
/// Immutable after construction, so one instance can serve any number of
/// concurrent queries.
pub struct ChatAgent {
    docs: ApiDocs,
    llm: Arc<dyn LanguageModel>,
    recon: Arc<dyn MonitoringApi>,
}

impl ChatAgent {
    pub fn new(docs: ApiDocs, llm: Arc<dyn LanguageModel>, recon: Arc<dyn MonitoringApi>) -> Self {
        Self { docs, llm, recon }
    }

    /// Load the API docs and build the Gemini and Recon clients.
    pub fn from_config(config: &ChatbotConfig) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?;
        let docs = ApiDocs::load(&config.docs)?;
        let llm = GeminiClient::new(&config.gemini, api_key).context("building Gemini client")?;
        let recon = ReconClient::new(&config.recon).context("building Recon client")?;

        tracing::info!(
            model = %llm.model_name(),
            recon_url = %recon.base_url(),
            guide_loaded = !docs.guide().is_empty(),
            "chatbot agent initialized"
        );

        Ok(Self::new(docs, Arc::new(llm), Arc::new(recon)))
    }

    pub fn docs(&self) -> &ApiDocs {
        &self.docs
    }

    /// Answer a natural-language question. Never fails.
    pub async fn process_query(&self, query: &str) -> String {
        if !self.docs.has_schema() {
            return SCHEMA_NOT_LOADED.to_string();
        }

        match self.run_pipeline(query).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, query, "query failed");
                format!("{ERROR_PREFIX} {e}")
            }
        }
    }

    async fn run_pipeline(&self, query: &str) -> Result<String, AgentError> {
        tracing::info!(query, model = %self.llm.model_name(), "analyzing query");

        let selected = self
            .llm
            .select_endpoint(query, self.docs.schema(), self.docs.guide())
            .await?;

        let Some(tool_call) = selected else {
            tracing::info!("no suitable API endpoint found, using fallback");
            return Ok(self.llm.fallback(query).await);
        };

        if let Some(reasoning) = tool_call.reasoning() {
            tracing::debug!(reasoning, "model reasoning");
        }

        let call = match tool_call {
            ToolCall::Documentation { answer, .. } => {
                tracing::info!("answered from documentation");
                return Ok(answer.unwrap_or_else(|| DOCUMENTATION_UNAVAILABLE.to_string()));
            }
            ToolCall::DataCall(call) => call,
        };

        tracing::info!(endpoint = %call.endpoint, params = ?call.parameters, "selected endpoint");
        let data = self.recon.execute(&call).await?;

        let summary = self.llm.summarize(query, &data, &call.endpoint).await;
        tracing::info!(endpoint = %call.endpoint, "response generated");
        Ok(summary)
    }

    /// Probe Gemini and Recon independently.
    pub async fn test_connections(&self) -> ConnectionReport {
        ConnectionReport {
            gemini: self.probe_llm().await,
            recon: self.probe_recon().await,
        }
    }

    async fn probe_llm(&self) -> ConnectionStatus {
        let reply = self.llm.fallback(CONNECTION_TEST_QUERY).await;
        if reply.trim().is_empty() {
            ConnectionStatus::error("No response from Gemini")
        } else {
            ConnectionStatus::connected()
        }
    }

    async fn probe_recon(&self) -> ConnectionStatus {
        if !self.recon.probe_connectivity().await {
            return ConnectionStatus::error("Cannot connect to Recon service");
        }
        match self.recon.fetch_cluster_summary().await {
            Ok(summary) => ConnectionStatus::connected().with_cluster_info(summary),
            Err(e) => {
                tracing::warn!(error = %e, "Recon cluster summary failed");
                ConnectionStatus::error(e.to_string())
            }
        }
    }

    /// What the chatbot can help with.
    pub fn capabilities(&self) -> &'static str {
        CAPABILITIES
    }
}
