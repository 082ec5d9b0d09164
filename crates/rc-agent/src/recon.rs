//! Recon REST client — plain GETs with query parameters and JSON bodies.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ReconError;
use rc_protocol::{ClusterSummary, DataCall};

/// Endpoint aggregated for the connection-test cluster summary.
pub const CLUSTER_STATE_ENDPOINT: &str = "/api/v1/clusterState";

/// Configuration for the Recon service.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    /// Recon HTTP base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. None waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:9888".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// The monitoring service as seen by the agent.
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// Run a data call and return the decoded JSON body.
    async fn execute(&self, call: &DataCall) -> Result<Value, ReconError>;

    /// Whether the service answers at all. Never fails.
    async fn probe_connectivity(&self) -> bool;

    /// Coarse datanode / container / pipeline counts.
    async fn fetch_cluster_summary(&self) -> Result<ClusterSummary, ReconError>;
}

/// `/api/v1/clusterState` response (only fields we need).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterState {
    total_datanodes: Option<u64>,
    healthy_datanodes: Option<u64>,
    containers: Option<u64>,
    missing_containers: Option<u64>,
    open_containers: Option<u64>,
    pipelines: Option<u64>,
    volumes: Option<u64>,
    buckets: Option<u64>,
    keys: Option<u64>,
}

impl From<ClusterState> for ClusterSummary {
    fn from(s: ClusterState) -> Self {
        Self {
            total_datanodes: s.total_datanodes,
            healthy_datanodes: s.healthy_datanodes,
            containers: s.containers,
            missing_containers: s.missing_containers,
            open_containers: s.open_containers,
            pipelines: s.pipelines,
            volumes: s.volumes,
            buckets: s.buckets,
            keys: s.keys,
        }
    }
}

/// HTTP client for the Ozone Recon REST API.
pub struct ReconClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReconClient {
    pub fn new(config: &ReconConfig) -> Result<Self, ReconError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ReconError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    async fn get_json<Q>(&self, endpoint: &str, query: &Q) -> Result<Value, ReconError>
    where
        Q: serde::Serialize + ?Sized + Sync,
    {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ReconError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ReconError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl MonitoringApi for ReconClient {
    async fn execute(&self, call: &DataCall) -> Result<Value, ReconError> {
        tracing::debug!(
            endpoint = %call.endpoint,
            params = ?call.parameters,
            "calling Recon API"
        );
        self.get_json(&call.endpoint, &call.parameters).await
    }

    async fn probe_connectivity(&self) -> bool {
        match self.client.get(self.url("/")).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Recon probe returned non-success");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, base_url = %self.base_url, "Recon probe failed");
                false
            }
        }
    }

    async fn fetch_cluster_summary(&self) -> Result<ClusterSummary, ReconError> {
        let no_params: [(&str, &str); 0] = [];
        let value = self.get_json(CLUSTER_STATE_ENDPOINT, &no_params).await?;
        let state: ClusterState =
            serde_json::from_value(value).map_err(|source| ReconError::Decode {
                endpoint: CLUSTER_STATE_ENDPOINT.to_string(),
                source,
            })?;
        Ok(state.into())
    }
}
