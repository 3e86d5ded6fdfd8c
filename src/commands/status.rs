//! `modash status` command.

use super::block_on;
use crate::context::ServiceContext;

/// Execute the `status` command: one status fetch, printed as JSON.
///
/// # Errors
///
/// Returns an error string if the job service cannot be reached or
/// answers with an error.
pub fn run(ctx: &ServiceContext, job_id: &str) -> Result<(), String> {
    let status = block_on(ctx.api.status(job_id))?
        .map_err(|e| format!("Failed to fetch status of job {job_id}: {e}"))?;
    let json = serde_json::to_string_pretty(&status)
        .map_err(|e| format!("Failed to serialize status: {e}"))?;
    println!("{json}");
    Ok(())
}
