//! `modash schema` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::schema;

/// Parses the DDL in `file` and returns the schema as pretty JSON.
///
/// # Errors
///
/// Returns an error string if the file cannot be read.
pub fn render(ctx: &ServiceContext, file: &Path) -> Result<String, String> {
    let ddl = ctx
        .fs
        .read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let schema = schema::parse(&ddl);

    for (table, rel) in schema.dangling_references() {
        tracing::warn!(
            table = %table.name,
            column = %rel.from_column,
            target = %rel.to_table,
            "reference to a table not in the schema"
        );
    }
    tracing::info!(
        tables = schema.tables.len(),
        columns = schema.column_count(),
        relationships = schema.relationship_count(),
        "parsed schema"
    );

    serde_json::to_string_pretty(&schema).map_err(|e| format!("Failed to serialize schema: {e}"))
}

/// Execute the `schema` command.
///
/// # Errors
///
/// Returns an error string if the file cannot be read.
pub fn run(ctx: &ServiceContext, file: &Path) -> Result<(), String> {
    println!("{}", render(ctx, file)?);
    Ok(())
}
