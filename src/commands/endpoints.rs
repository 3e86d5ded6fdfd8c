//! `modash endpoints` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::endpoints;

/// Extracts endpoints from the route source in `file` as pretty JSON.
///
/// # Errors
///
/// Returns an error string if the file cannot be read.
pub fn render(ctx: &ServiceContext, file: &Path) -> Result<String, String> {
    let source = ctx
        .fs
        .read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let found = endpoints::extract(&source);
    tracing::info!(endpoints = found.len(), "extracted endpoints");
    serde_json::to_string_pretty(&found).map_err(|e| format!("Failed to serialize endpoints: {e}"))
}

/// Execute the `endpoints` command.
///
/// # Errors
///
/// Returns an error string if the file cannot be read.
pub fn run(ctx: &ServiceContext, file: &Path) -> Result<(), String> {
    println!("{}", render(ctx, file)?);
    Ok(())
}
