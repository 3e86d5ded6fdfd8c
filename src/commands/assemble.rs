//! `modash assemble` command.

use std::path::Path;

use super::emit_dashboard;
use crate::context::ServiceContext;
use crate::dashboard;
use crate::payload::ResultPayload;

/// Execute the `assemble` command.
///
/// Reads a saved result payload, builds the dashboard model and writes it
/// to `output`, or prints it when no output is given.
///
/// # Errors
///
/// Returns an error string if the payload cannot be read or decoded, or the
/// model cannot be written.
pub fn run(ctx: &ServiceContext, result: &Path, output: Option<&Path>) -> Result<(), String> {
    let text = ctx
        .fs
        .read_to_string(result)
        .map_err(|e| format!("Failed to read {}: {e}", result.display()))?;
    let payload: ResultPayload = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to decode result payload {}: {e}", result.display()))?;

    let model = dashboard::assemble(&payload);
    emit_dashboard(ctx, &model, output)
}
