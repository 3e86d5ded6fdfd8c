//! Live adapter for the `JobApi` port over HTTP.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::payload::ResultPayload;
use crate::ports::job_api::{ApiError, ApiFuture, InputFile, JobApi, StatusResponse, SubmitResponse};

const SUBMIT_PATH: &str = "/api/modernize";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Live job service client speaking JSON over HTTP.
pub struct LiveJobApi {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl LiveJobApi {
    /// Creates a client for the service at `base_url` (e.g. `http://localhost:3001`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url, request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn job_url(&self, job_id: &str, leaf: &str) -> String {
        format!("{}/api/jobs/{job_id}/{leaf}", self.base_url)
    }
}

/// Error body shape shared by all endpoints.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn transport(e: &reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Reads the body and decodes it, mapping non-success statuses to [`ApiError::Http`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(text);
        return Err(ApiError::Http { status: status.as_u16(), message });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

impl JobApi for LiveJobApi {
    fn submit<'a>(&'a self, files: &'a [InputFile]) -> ApiFuture<'a, SubmitResponse> {
        Box::pin(async move {
            let mut form = Form::new();
            for file in files {
                let part = Part::bytes(file.contents.clone()).file_name(file.filename.clone());
                form = form.part(file.part.as_str(), part);
            }

            let response = self
                .client
                .post(format!("{}{SUBMIT_PATH}", self.base_url))
                .timeout(self.request_timeout)
                .multipart(form)
                .send()
                .await
                .map_err(|e| transport(&e))?;

            decode(response).await
        })
    }

    fn status<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, StatusResponse> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.job_url(job_id, "status"))
                .timeout(self.request_timeout)
                .send()
                .await
                .map_err(|e| transport(&e))?;

            decode(response).await
        })
    }

    fn result<'a>(&'a self, job_id: &'a str) -> ApiFuture<'a, ResultPayload> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.job_url(job_id, "result"))
                .timeout(self.request_timeout)
                .send()
                .await
                .map_err(|e| transport(&e))?;

            decode(response).await
        })
    }
}
