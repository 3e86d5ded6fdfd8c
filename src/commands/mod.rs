//! Command dispatch and handlers.

pub mod assemble;
pub mod endpoints;
pub mod schema;
pub mod status;
pub mod submit;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::dashboard::{self, DashboardModel};

/// Dispatch a parsed command to its handler.
///
/// When `MODASH_RECORD` names a directory, all port interactions are
/// recorded to per-port cassette files under it.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command, settings: &Settings) -> Result<(), String> {
    let settings = with_overrides(command, settings)?;

    let (ctx, session) = if let Some(root) = &settings.record_dir {
        let (ctx, session) = ServiceContext::recording_at(root, &settings)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&settings), None)
    };

    let result = dispatch_with_context(command, &ctx, &settings);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        return settle(result, finish_recording(session));
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<(), String> {
    match command {
        Command::Schema { file } => schema::run(ctx, file),
        Command::Endpoints { file } => endpoints::run(ctx, file),
        Command::Assemble { result, output } => assemble::run(ctx, result, output.as_deref()),
        Command::Submit { files, output, .. } => {
            submit::run(ctx, settings.poll_policy(), files, output.as_deref())
        }
        Command::Status { job_id, .. } => status::run(ctx, job_id),
    }
}

/// Applies the command's flags on top of the environment settings.
///
/// # Errors
///
/// Returns an error string if `--server` is not an http(s) URL.
pub fn with_overrides(command: &Command, settings: &Settings) -> Result<Settings, String> {
    let mut settings = settings.clone();
    match command {
        Command::Submit { server, interval_ms, max_wait_secs, .. } => {
            if let Some(server) = server {
                settings = settings.with_server_url(server).map_err(|e| e.to_string())?;
            }
            if let Some(ms) = interval_ms {
                settings.poll_interval = Duration::from_millis((*ms).max(1));
            }
            if let Some(secs) = max_wait_secs {
                settings.max_poll_duration = (*secs > 0).then(|| Duration::from_secs(*secs));
            }
        }
        Command::Status { server: Some(server), .. } => {
            settings = settings.with_server_url(server).map_err(|e| e.to_string())?;
        }
        _ => {}
    }
    Ok(settings)
}

/// Runs a future to completion on a fresh current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

/// Writes the model to `output`, or prints it when there is none.
pub(crate) fn emit_dashboard(
    ctx: &ServiceContext,
    model: &DashboardModel,
    output: Option<&Path>,
) -> Result<(), String> {
    match output {
        Some(path) => {
            dashboard::export(ctx.fs.as_ref(), model, path)?;
            eprintln!("Dashboard written to {}", path.display());
        }
        None => println!("{}", model.to_json()?),
    }
    Ok(())
}

/// Combines the command outcome with the recording outcome.
///
/// A command error always wins; a recording failure behind it is logged.
fn settle(result: Result<(), String>, recording: Result<(), String>) -> Result<(), String> {
    match (result, recording) {
        (Err(command), Err(recording)) => {
            tracing::error!(error = %recording, "failed to save recording");
            Err(command)
        }
        (result, recording) => result.and(recording),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
