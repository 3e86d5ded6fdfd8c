//! Recording adapter for the `JobApi` port.

use serde::Serialize;

use super::record_interaction;
use crate::cassette::session::SharedRecorder;
use crate::payload::ResultPayload;
use crate::ports::job_api::{ApiFuture, InputFile, JobApi, PartName, StatusResponse, SubmitResponse};

/// Records job service calls while delegating to an inner client.
pub struct RecordingJobApi {
    inner: Box<dyn JobApi>,
    recorder: SharedRecorder,
}

impl RecordingJobApi {
    /// Wraps `inner`, appending every call to `recorder`.
    pub fn new(inner: Box<dyn JobApi>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

/// Uploaded file as it appears in a cassette. Contents are summarized by size.
#[derive(Serialize)]
struct FileSummary<'a> {
    part: PartName,
    filename: &'a str,
    bytes: usize,
}

#[derive(Serialize)]
struct SubmitInput<'a> {
    files: Vec<FileSummary<'a>>,
}

#[derive(Serialize)]
struct JobInput<'a> {
    job_id: &'a str,
}

impl JobApi for RecordingJobApi {
    fn submit<'a>(&'a self, files: &'a [InputFile]) -> ApiFuture<'a, SubmitResponse> {
        Box::pin(async move {
            let result = self.inner.submit(files).await;
            let input = SubmitInput {
                files: files
                    .iter()
                    .map(|f| FileSummary { part: f.part, filename: &f.filename, bytes: f.contents.len() })
                    .collect(),
            };
            record_interaction(&self.recorder, "api", "submit", &input, &result);
            result
        })
    }

    fn status<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, StatusResponse> {
        Box::pin(async move {
            let result = self.inner.status(job_id).await;
            record_interaction(&self.recorder, "api", "status", &JobInput { job_id }, &result);
            result
        })
    }

    fn result<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, ResultPayload> {
        Box::pin(async move {
            let result = self.inner.result(job_id).await;
            record_interaction(&self.recorder, "api", "result", &JobInput { job_id }, &result);
            result
        })
    }
}
