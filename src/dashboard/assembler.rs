//! Composes parser outputs and payload metadata into a [`DashboardModel`].

use serde_json::json;

use super::{DashboardMetrics, DashboardModel};
use crate::payload::{Metadata, ResultPayload};
use crate::{endpoints, schema};

/// Architecture metadata used when the payload carries none.
#[must_use]
pub fn default_architecture() -> Metadata {
    Metadata::from([
        ("pattern".to_string(), json!("Layered REST service")),
        ("database".to_string(), json!("PostgreSQL")),
        ("apiStyle".to_string(), json!("REST")),
        ("deployment".to_string(), json!("Containerized")),
    ])
}

/// Security metadata used when the payload carries none.
#[must_use]
pub fn default_security() -> Metadata {
    Metadata::from([
        ("authentication".to_string(), json!("JWT bearer tokens")),
        ("authorization".to_string(), json!("Role-based access control")),
        ("transport".to_string(), json!("TLS")),
        ("inputValidation".to_string(), json!("Schema validation on all endpoints")),
    ])
}

/// Builds a dashboard model from a result payload.
///
/// Never fails: missing SQL text gives an empty schema, missing route text
/// gives the fallback endpoints, missing metadata gives the defaults.
#[must_use]
pub fn assemble(payload: &ResultPayload) -> DashboardModel {
    build(payload, None)
}

/// Like [`assemble`], stamping the id of the job that produced the payload.
#[must_use]
pub fn assemble_for_job(payload: &ResultPayload, job_id: &str) -> DashboardModel {
    build(payload, Some(job_id.to_string()))
}

fn build(payload: &ResultPayload, job_id: Option<String>) -> DashboardModel {
    let schema = payload.sql_text().map(schema::parse).unwrap_or_default();
    let endpoints = payload.route_text().map_or_else(endpoints::fallback, endpoints::extract);

    let assets = payload.modernization_assets.as_ref();
    let architecture =
        assets.and_then(|a| a.architecture.clone()).unwrap_or_else(default_architecture);
    let security = assets.and_then(|a| a.security.clone()).unwrap_or_else(default_security);
    let summary = payload.parsed_schema.as_ref();

    let metrics = DashboardMetrics {
        table_count: schema.tables.len(),
        column_count: schema.column_count(),
        relationship_count: schema.relationship_count(),
        dangling_reference_count: schema.dangling_references().len(),
        endpoint_count: endpoints.len(),
        record_name: summary.and_then(|s| s.record_name.clone()),
        field_count: summary.and_then(|s| s.field_count),
        auxiliary: assets.map(|a| a.metrics.clone()).unwrap_or_default(),
    };

    DashboardModel { job_id, schema, endpoints, architecture, security, metrics }
}
