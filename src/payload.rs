//! Result payloads produced by the code-generation service.
//!
//! The same `modernizationAssets` shape arrives either inline in a
//! synchronous submission response or from the result query of a completed
//! job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pass-through key-value metadata.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Generated artifacts for one job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModernizationAssets {
    /// Raw SQL DDL text.
    #[serde(default, alias = "sql", alias = "databaseSchema")]
    pub sql_schema: Option<String>,
    /// Raw route-registration source text.
    #[serde(default, alias = "restApi", alias = "routes")]
    pub api_routes: Option<String>,
    /// Auxiliary numeric metadata.
    #[serde(default)]
    pub metrics: Metadata,
    /// Architecture description, when the generator provides one.
    #[serde(default)]
    pub architecture: Option<Metadata>,
    /// Security description, when the generator provides one.
    #[serde(default)]
    pub security: Option<Metadata>,
}

/// Summary of the parsed input record layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSchema {
    /// Name of the top-level record.
    #[serde(default)]
    pub record_name: Option<String>,
    /// Number of fields in the record.
    #[serde(default)]
    pub field_count: Option<u64>,
}

/// Everything needed to assemble a dashboard model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    /// Generated artifacts.
    #[serde(default)]
    pub modernization_assets: Option<ModernizationAssets>,
    /// Input record summary.
    #[serde(default)]
    pub parsed_schema: Option<ParsedSchema>,
}

impl ResultPayload {
    /// Raw SQL text, if present.
    #[must_use]
    pub fn sql_text(&self) -> Option<&str> {
        self.modernization_assets.as_ref()?.sql_schema.as_deref()
    }

    /// Raw route source text, if present.
    #[must_use]
    pub fn route_text(&self) -> Option<&str> {
        self.modernization_assets.as_ref()?.api_routes.as_deref()
    }
}
