//! Job service port for submitting inputs and observing generation jobs.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::ResultPayload;

/// Boxed future type alias used by [`JobApi`] to keep the trait dyn-compatible.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Failure of a single call to the job service.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ApiError {
    /// The request never produced a response (unreachable host, reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the raw body.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether repeating the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Http { status, .. } => *status >= 500 || *status == 429,
            ApiError::Decode(_) => false,
        }
    }
}

/// Multipart field name for an uploaded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartName {
    /// COBOL copybook (`.cpy`).
    Copybook,
    /// Data file (`.dat`).
    Datafile,
    /// Anything else.
    File,
}

impl PartName {
    /// Chooses the part name from a file name's extension, ignoring case.
    #[must_use]
    pub fn for_filename(filename: &str) -> Self {
        match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("cpy") => Self::Copybook,
            Some(ext) if ext.eq_ignore_ascii_case("dat") => Self::Datafile,
            _ => Self::File,
        }
    }

    /// Field name used in the multipart request.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copybook => "copybook",
            Self::Datafile => "datafile",
            Self::File => "file",
        }
    }
}

/// One named input file for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Multipart field name.
    pub part: PartName,
    /// File name sent with the part.
    pub filename: String,
    /// File contents.
    pub contents: Vec<u8>,
}

impl InputFile {
    /// Creates an input, deriving the part name from the file extension.
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Self {
        let filename = filename.into();
        Self { part: PartName::for_filename(&filename), filename, contents }
    }
}

/// Job status reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not started.
    Queued,
    /// In progress.
    Running,
    /// Finished; the result can be fetched.
    Completed,
    /// Finished unsuccessfully.
    Failed,
}

impl JobStatus {
    /// `completed` and `failed` are terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Response to a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Whether the service accepted the input.
    pub success: bool,
    /// Rejection reason when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Identifier of the asynchronous job, when one was created.
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Results, when the service answered synchronously.
    #[serde(flatten)]
    pub payload: ResultPayload,
}

/// Response to a status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Current status.
    pub status: JobStatus,
    /// Completion percentage, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Log lines so far.
    #[serde(default)]
    pub logs: Vec<String>,
    /// Failure message, when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Status response with no progress, logs or error.
    #[must_use]
    pub fn bare(status: JobStatus) -> Self {
        Self { status, progress: None, logs: Vec::new(), error: None }
    }
}

/// Submits inputs to, and observes jobs of, the code-generation service.
pub trait JobApi: Send + Sync {
    /// Uploads the inputs as one multipart submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    fn submit<'a>(&'a self, files: &'a [InputFile]) -> ApiFuture<'a, SubmitResponse>;

    /// Fetches the current status of a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    fn status<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, StatusResponse>;

    /// Fetches the result of a completed job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    fn result<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, ResultPayload>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn part_names_follow_extension() {
        assert_eq!(PartName::for_filename("CUSTOMER.cpy"), PartName::Copybook);
        assert_eq!(PartName::for_filename("customer.CPY"), PartName::Copybook);
        assert_eq!(PartName::for_filename("records.dat"), PartName::Datafile);
        assert_eq!(PartName::for_filename("notes.txt"), PartName::File);
        assert_eq!(PartName::for_filename("noextension"), PartName::File);
        assert_eq!(InputFile::new("a.dat", vec![1]).part.as_str(), "datafile");
    }

    #[test]
    fn retryable_errors() {
        assert!(ApiError::Transport("refused".into()).is_retryable());
        assert!(ApiError::Http { status: 503, message: String::new() }.is_retryable());
        assert!(ApiError::Http { status: 429, message: String::new() }.is_retryable());
        assert!(!ApiError::Http { status: 404, message: String::new() }.is_retryable());
        assert!(!ApiError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn submit_response_carries_job_id_or_inline_assets() {
        let queued: SubmitResponse =
            serde_json::from_value(json!({"success": true, "jobId": "j-1"})).unwrap();
        assert_eq!(queued.job_id.as_deref(), Some("j-1"));
        assert!(queued.payload.modernization_assets.is_none());

        let inline: SubmitResponse = serde_json::from_value(json!({
            "success": true,
            "modernizationAssets": {"sqlSchema": "CREATE TABLE t (a INT);"},
            "parsedSchema": {"recordName": "T", "fieldCount": 1}
        }))
        .unwrap();
        assert!(inline.job_id.is_none());
        assert_eq!(inline.payload.sql_text(), Some("CREATE TABLE t (a INT);"));

        let rejected: SubmitResponse =
            serde_json::from_value(json!({"success": false, "error": "bad copybook"})).unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error.as_deref(), Some("bad copybook"));
    }

    #[test]
    fn status_response_defaults() {
        let status: StatusResponse = serde_json::from_value(json!({"status": "running"})).unwrap();
        assert_eq!(status, StatusResponse::bare(JobStatus::Running));
        assert!(!status.status.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
