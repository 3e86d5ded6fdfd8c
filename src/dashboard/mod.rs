//! Dashboard model consumed by the presentation layer.
//!
//! The model is built once per completed job by [`assemble`] and replaced
//! wholesale on the next job. Exporting writes it as a single JSON document.

mod assembler;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use assembler::{assemble, assemble_for_job, default_architecture, default_security};

use crate::endpoints::Endpoint;
use crate::payload::Metadata;
use crate::ports::FileSystem;
use crate::schema::Schema;

/// Counts derived from the parsed structures and the payload summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Number of tables in the schema.
    pub table_count: usize,
    /// Number of columns across all tables.
    pub column_count: usize,
    /// Number of foreign-key relationships.
    pub relationship_count: usize,
    /// Relationships whose target table is not in the schema.
    pub dangling_reference_count: usize,
    /// Number of endpoints, fallback endpoints included.
    pub endpoint_count: usize,
    /// Input record name from the payload summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_name: Option<String>,
    /// Input field count from the payload summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<u64>,
    /// Auxiliary metrics passed through from the payload.
    #[serde(default)]
    pub auxiliary: Metadata,
}

/// The single model a dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardModel {
    /// Job that produced the payload, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Relational schema recovered from the SQL text.
    pub schema: Schema,
    /// API surface recovered from the route text.
    pub endpoints: Vec<Endpoint>,
    /// Architecture metadata.
    pub architecture: Metadata,
    /// Security metadata.
    pub security: Metadata,
    /// Derived metrics.
    pub metrics: DashboardMetrics,
}

impl DashboardModel {
    /// Serializes the model as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize dashboard: {e}"))
    }
}

/// Writes the whole model to `path` as one JSON document.
///
/// # Errors
///
/// Returns an error string if serialization or the write fails.
pub fn export(fs: &dyn FileSystem, model: &DashboardModel, path: &Path) -> Result<(), String> {
    let json = model.to_json()?;
    fs.write(path, &json).map_err(|e| format!("Failed to write dashboard to {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "exported dashboard model");
    Ok(())
}
