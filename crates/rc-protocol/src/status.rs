use serde::{Deserialize, Serialize};

/// Reachability of one remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Connected,
    Error,
    #[default]
    Unknown,
}

/// Coarse cluster counts shown after a successful Recon probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_datanodes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy_datanodes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_containers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_containers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipelines: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<u64>,
}

/// Result of probing a single service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: ServiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_info: Option<ClusterSummary>,
}

impl ConnectionStatus {
    pub fn connected() -> Self {
        Self {
            status: ServiceStatus::Connected,
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Error,
            message: Some(message.into()),
            cluster_info: None,
        }
    }

    pub fn with_cluster_info(mut self, info: ClusterSummary) -> Self {
        self.cluster_info = Some(info);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.status == ServiceStatus::Connected
    }
}

/// Connection status for both remote services, keyed `gemini` and `recon`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub gemini: ConnectionStatus,
    pub recon: ConnectionStatus,
}

impl ConnectionReport {
    /// Iterate services in display order.
    pub fn services(&self) -> [(&'static str, &ConnectionStatus); 2] {
        [("gemini", &self.gemini), ("recon", &self.recon)]
    }
}
