//! Job snapshots and client lifecycle states.
//!
//! A [`Job`] is never mutated in place: every observation produces a new
//! snapshot, and once a terminal status has been observed further
//! observations return the snapshot unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::ResultPayload;
use crate::ports::job_api::{JobStatus, StatusResponse};

/// Message used when the service reports a failure without saying why.
pub const GENERIC_FAILURE: &str = "Job failed without an error message";

/// Where the client is in the lifecycle of its current job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No job submitted.
    Idle,
    /// Submission in flight.
    Submitted,
    /// Accepted, waiting to start.
    Queued,
    /// In progress.
    Running,
    /// Finished with a result.
    Completed,
    /// Finished unsuccessfully.
    Failed,
    /// No longer watched after cancellation, a timeout or lost contact.
    /// The service may still be running the job.
    Stopped,
}

impl LifecycleState {
    /// `Completed` and `Failed` never transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<JobStatus> for LifecycleState {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Queued => Self::Queued,
            JobStatus::Running => Self::Running,
            JobStatus::Completed => Self::Completed,
            JobStatus::Failed => Self::Failed,
        }
    }
}

/// Snapshot of one asynchronous job as last observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Server-assigned id.
    pub id: String,
    /// Last observed status.
    pub status: JobStatus,
    /// Completion percentage in `0..=100`, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Log lines reported so far.
    #[serde(default)]
    pub logs: Vec<String>,
    /// Failure message, when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Result payload, once fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultPayload>,
    /// When the job was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When the snapshot was taken.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// A freshly accepted job.
    #[must_use]
    pub fn queued(id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            progress: None,
            logs: Vec::new(),
            error: None,
            result: None,
            submitted_at: at,
            updated_at: at,
        }
    }

    /// A job the service completed during submission.
    #[must_use]
    pub fn completed(id: impl Into<String>, result: ResultPayload, at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Completed,
            progress: Some(100),
            result: Some(result),
            ..Self::queued(id, at)
        }
    }

    /// Whether the last observed status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Snapshot after observing a status response. Terminal jobs are returned unchanged.
    #[must_use]
    pub fn observe(&self, response: &StatusResponse, at: DateTime<Utc>) -> Self {
        if self.is_terminal() {
            return self.clone();
        }
        Self {
            id: self.id.clone(),
            status: response.status,
            progress: response.progress.map(clamp_progress).or(self.progress),
            logs: response.logs.clone(),
            error: response.error.clone(),
            result: None,
            submitted_at: self.submitted_at,
            updated_at: at,
        }
    }

    /// Snapshot carrying the fetched result. Only a completed job accepts one.
    #[must_use]
    pub fn with_result(&self, result: ResultPayload, at: DateTime<Utc>) -> Self {
        if self.status != JobStatus::Completed || self.result.is_some() {
            return self.clone();
        }
        Self { result: Some(result), updated_at: at, ..self.clone() }
    }

    /// The server's failure message, or [`GENERIC_FAILURE`] when it gave none.
    #[must_use]
    pub fn failure_message(&self) -> String {
        match self.error.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_progress(progress: f64) -> u8 {
    if progress.is_nan() {
        return 0;
    }
    progress.clamp(0.0, 100.0).round() as u8
}
