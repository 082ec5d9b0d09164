//! API schema and guide loader.
//!
//! Both documents are read once at startup and kept as immutable strings.
//! They are only ever used as prompt context, never parsed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DocsError;

/// Paths of the documents fed to the model.
#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    /// OpenAPI description of the Recon REST API. Required.
    #[serde(default = "default_schema_path")]
    pub schema_path: PathBuf,
    /// Prose guide on what each API is for. Optional.
    #[serde(default = "default_guide_path")]
    pub guide_path: PathBuf,
}

/// `api_schema/` at the workspace root, independent of the working directory.
const BUNDLED_DOCS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../api_schema");

fn default_schema_path() -> PathBuf {
    Path::new(BUNDLED_DOCS_DIR).join("recon-api.yaml")
}
fn default_guide_path() -> PathBuf {
    Path::new(BUNDLED_DOCS_DIR).join("recon-api-guide.md")
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            schema_path: default_schema_path(),
            guide_path: default_guide_path(),
        }
    }
}

/// The API schema and guide text.
#[derive(Debug, Clone, Default)]
pub struct ApiDocs {
    schema: String,
    guide: String,
}

impl ApiDocs {
    pub fn new(schema: impl Into<String>, guide: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            guide: guide.into(),
        }
    }

    /// Read the schema (required) and the guide (optional) from disk.
    pub fn load(config: &DocsConfig) -> Result<Self, DocsError> {
        let schema = read_schema(&config.schema_path)?;
        tracing::info!(path = %config.schema_path.display(), bytes = schema.len(), "API schema loaded");

        let guide = match std::fs::read_to_string(&config.guide_path) {
            Ok(guide) => {
                tracing::info!(path = %config.guide_path.display(), bytes = guide.len(), "API guide loaded");
                guide
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %config.guide_path.display(), "API guide not found, proceeding with schema only");
                String::new()
            }
            Err(e) => {
                tracing::warn!(path = %config.guide_path.display(), error = %e, "error loading API guide, proceeding with schema only");
                String::new()
            }
        };

        Ok(Self { schema, guide })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn guide(&self) -> &str {
        &self.guide
    }

    pub fn has_schema(&self) -> bool {
        !self.schema.trim().is_empty()
    }
}

fn read_schema(path: &Path) -> Result<String, DocsError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            DocsError::SchemaNotFound(path.to_path_buf())
        } else {
            DocsError::SchemaRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
