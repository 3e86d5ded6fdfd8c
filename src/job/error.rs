//! Failure taxonomy for the job lifecycle.

use std::time::Duration;

use thiserror::Error;

use crate::ports::job_api::ApiError;

/// Why a submission or a watched job did not produce a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobError {
    /// The service rejected the input, or the submission call failed. No job exists.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The service reported the job as failed.
    #[error("job {job_id} failed: {message}")]
    Failed {
        /// Failed job.
        job_id: String,
        /// Server-provided error, or a generic message when none was given.
        message: String,
    },

    /// Status or result fetches kept failing until retries ran out.
    #[error("lost contact with job {job_id}: {source}")]
    Connection {
        /// Job being watched.
        job_id: String,
        /// Last failure observed.
        #[source]
        source: ApiError,
    },

    /// The job did not reach a terminal state within the poll bounds.
    #[error("job {job_id} still unfinished after {ticks} polls ({}s)", .elapsed.as_secs())]
    TimedOut {
        /// Job being watched.
        job_id: String,
        /// Status fetches issued before giving up.
        ticks: u32,
        /// Time spent watching.
        elapsed: Duration,
    },

    /// Watching stopped because the job was cancelled or superseded.
    #[error("stopped watching job {job_id}")]
    Cancelled {
        /// Job no longer watched.
        job_id: String,
    },
}

impl JobError {
    /// Id of the job the error refers to, if one was created.
    #[must_use]
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Self::Submission(_) => None,
            Self::Failed { job_id, .. }
            | Self::Connection { job_id, .. }
            | Self::TimedOut { job_id, .. }
            | Self::Cancelled { job_id } => Some(job_id),
        }
    }
}
