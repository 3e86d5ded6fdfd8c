//! `modash submit` command.

use std::path::{Path, PathBuf};

use super::{block_on, emit_dashboard};
use crate::context::ServiceContext;
use crate::job::{JobLifecycleClient, PollPolicy};
use crate::ports::job_api::InputFile;

/// Reads each path into a named input for upload.
///
/// # Errors
///
/// Returns an error string naming the first file that is missing or cannot
/// be read.
pub fn load_inputs(ctx: &ServiceContext, files: &[PathBuf]) -> Result<Vec<InputFile>, String> {
    files
        .iter()
        .map(|path| {
            if !ctx.fs.exists(path) {
                return Err(format!("Input file not found: {}", path.display()));
            }
            let contents = ctx
                .fs
                .read_bytes(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            let filename = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok(InputFile::new(filename, contents))
        })
        .collect()
}

/// Execute the `submit` command.
///
/// Uploads the inputs, waits for the job to finish and exports the
/// resulting dashboard model.
///
/// # Errors
///
/// Returns an error string if an input cannot be read, the job does not
/// complete, or the model cannot be written.
pub fn run(
    ctx: &ServiceContext,
    policy: PollPolicy,
    files: &[PathBuf],
    output: Option<&Path>,
) -> Result<(), String> {
    let inputs = load_inputs(ctx, files)?;
    let client = JobLifecycleClient::new(ctx, policy);
    let model = block_on(client.run(&inputs))?.map_err(|e| e.to_string())?;

    tracing::info!(
        job_id = model.job_id.as_deref().unwrap_or("-"),
        tables = model.metrics.table_count,
        endpoints = model.metrics.endpoint_count,
        "assembled dashboard"
    );
    emit_dashboard(ctx, &model, output)
}
