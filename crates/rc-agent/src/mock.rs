//! Scripted `LanguageModel` and `MonitoringApi` implementations for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ReconError;
use crate::llm::LanguageModel;
use crate::recon::MonitoringApi;
use rc_protocol::{ClusterSummary, DataCall, ToolCall, ToolCallError};

/// A model that replays fixed answers and counts how often it was asked.
pub struct ScriptedModel {
    selection: Result<Option<ToolCall>, ToolCallError>,
    summary: String,
    fallback: String,
    select_calls: AtomicUsize,
    summarize_calls: AtomicUsize,
    fallback_calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(selection: Result<Option<ToolCall>, ToolCallError>) -> Self {
        Self {
            selection,
            summary: "Scripted summary.".into(),
            fallback: "I can only answer questions about Ozone Recon.".into(),
            select_calls: AtomicUsize::new(0),
            summarize_calls: AtomicUsize::new(0),
            fallback_calls: AtomicUsize::new(0),
        }
    }

    /// Select the given data call.
    pub fn selecting(endpoint: &str) -> Self {
        Self::new(Ok(Some(ToolCall::DataCall(DataCall {
            endpoint: endpoint.into(),
            method: "GET".into(),
            parameters: Default::default(),
            reasoning: None,
        }))))
    }

    /// Answer from documentation.
    pub fn documenting(answer: Option<&str>) -> Self {
        Self::new(Ok(Some(ToolCall::Documentation {
            answer: answer.map(str::to_string),
            reasoning: Some("scripted".into()),
        })))
    }

    /// Report "no suitable endpoint".
    pub fn no_endpoint() -> Self {
        Self::new(Ok(None))
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }

    pub fn summarize_calls(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn select_endpoint(
        &self,
        _query: &str,
        _schema: &str,
        _guide: &str,
    ) -> Result<Option<ToolCall>, ToolCallError> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        self.selection.clone()
    }

    async fn summarize(&self, _query: &str, _response: &Value, _endpoint: &str) -> String {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        self.summary.clone()
    }

    async fn fallback(&self, _query: &str) -> String {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        self.fallback.clone()
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// An in-memory Recon that serves canned JSON by endpoint.
pub struct MockRecon {
    responses: HashMap<String, Value>,
    reachable: bool,
    summary: Option<ClusterSummary>,
    execute_calls: AtomicUsize,
}

impl MockRecon {
    /// Reachable, no endpoints, empty cluster summary.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            reachable: true,
            summary: Some(ClusterSummary::default()),
            execute_calls: AtomicUsize::new(0),
        }
    }

    /// Not reachable at all.
    pub fn offline() -> Self {
        Self {
            reachable: false,
            summary: None,
            ..Self::new()
        }
    }

    /// Serve `body` for GETs to `endpoint`.
    pub fn with_response(mut self, endpoint: impl Into<String>, body: Value) -> Self {
        self.responses.insert(endpoint.into(), body);
        self
    }

    /// Cluster summary to report; `None` makes the fetch fail.
    pub fn with_summary(mut self, summary: Option<ClusterSummary>) -> Self {
        self.summary = summary;
        self
    }

    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRecon {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MonitoringApi for MockRecon {
    async fn execute(&self, call: &DataCall) -> Result<Value, ReconError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(&call.endpoint)
            .cloned()
            .ok_or_else(|| ReconError::Status {
                status: 404,
                endpoint: call.endpoint.clone(),
                body: "Not Found".into(),
            })
    }

    async fn probe_connectivity(&self) -> bool {
        self.reachable
    }

    async fn fetch_cluster_summary(&self) -> Result<ClusterSummary, ReconError> {
        self.summary.clone().ok_or_else(|| ReconError::Status {
            status: 503,
            endpoint: crate::recon::CLUSTER_STATE_ENDPOINT.into(),
            body: "Service Unavailable".into(),
        })
    }
}
