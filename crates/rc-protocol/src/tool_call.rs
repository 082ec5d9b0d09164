use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator values the model may use for documentation answers.
const DOCUMENTATION_TAGS: &[&str] = &["DOCUMENTATION_QUERY", "documentation"];

/// Decision produced by the endpoint-selection step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolCall {
    /// Fetch live data from a Recon endpoint.
    DataCall(DataCall),
    /// Answer directly from the API guide; no Recon call is made.
    Documentation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reasoning: Option<String>,
    },
}

/// A GET against the monitoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCall {
    /// Path relative to the Recon base URL, e.g. `/api/v1/clusterState`.
    pub endpoint: String,
    /// HTTP method. Only `GET` survives decoding.
    pub method: String,
    /// Query parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Why a model-produced JSON value is not a usable tool call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolCallError {
    #[error("tool call is not a JSON object")]
    NotAnObject,

    #[error("tool call has no endpoint")]
    MissingEndpoint,

    #[error("unsupported HTTP method '{0}', only GET is allowed")]
    UnsupportedMethod(String),

    #[error("parameter '{0}' must be a string, number or boolean")]
    InvalidParameter(String),
}

impl ToolCall {
    /// Decode a loosely-shaped JSON object emitted by the model.
    ///
    /// An object tagged `DOCUMENTATION_QUERY` (or `documentation`) becomes
    /// [`ToolCall::Documentation`]; anything else must look like a data call.
    pub fn from_json(value: &Value) -> Result<Self, ToolCallError> {
        let obj = value.as_object().ok_or(ToolCallError::NotAnObject)?;

        let tag = obj.get("type").and_then(Value::as_str);
        if tag.is_some_and(|t| DOCUMENTATION_TAGS.contains(&t)) {
            return Ok(ToolCall::Documentation {
                answer: string_field(obj, "answer"),
                reasoning: string_field(obj, "reasoning"),
            });
        }

        let endpoint = obj
            .get("endpoint")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ToolCallError::MissingEndpoint)?;

        let method = obj
            .get("method")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("GET")
            .to_ascii_uppercase();
        if method != "GET" {
            return Err(ToolCallError::UnsupportedMethod(method));
        }

        let mut parameters = BTreeMap::new();
        if let Some(Value::Object(params)) = obj.get("parameters") {
            for (name, raw) in params {
                let rendered = match raw {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => continue,
                    Value::Array(_) | Value::Object(_) => {
                        return Err(ToolCallError::InvalidParameter(name.clone()));
                    }
                };
                parameters.insert(name.clone(), rendered);
            }
        }

        Ok(ToolCall::DataCall(DataCall {
            endpoint: endpoint.to_string(),
            method,
            parameters,
            reasoning: string_field(obj, "reasoning"),
        }))
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            ToolCall::DataCall(call) => call.reasoning.as_deref(),
            ToolCall::Documentation { reasoning, .. } => reasoning.as_deref(),
        }
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
