//! Replaying adapter for the `JobApi` port.

use std::sync::Mutex;

use super::replay_value;
use crate::cassette::replayer::CassetteReplayer;
use crate::payload::ResultPayload;
use crate::ports::job_api::{ApiError, ApiFuture, InputFile, JobApi, StatusResponse, SubmitResponse};

/// Serves recorded job service responses, errors included.
pub struct ReplayingJobApi {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingJobApi {
    /// Creates a replaying client over a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, ApiError> {
        replay_value(&self.replayer, "api", method)
    }
}

impl JobApi for ReplayingJobApi {
    fn submit<'a>(&'a self, _files: &'a [InputFile]) -> ApiFuture<'a, SubmitResponse> {
        Box::pin(async move { self.replay("submit") })
    }

    fn status<'a>(&'a self, _job_id: &'a str) -> ApiFuture<'a, StatusResponse> {
        Box::pin(async move { self.replay("status") })
    }

    fn result<'a>(&'a self, _job_id: &'a str) -> ApiFuture<'a, ResultPayload> {
        Box::pin(async move { self.replay("result") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ports::job_api::JobStatus;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn replays_statuses_and_wire_errors() {
        let interactions = vec![
            Interaction {
                seq: 0,
                port: "api".into(),
                method: "status".into(),
                input: json!({"job_id": "j-1"}),
                output: json!({"Ok": {"status": "running", "progress": 40.0}}),
            },
            Interaction {
                seq: 1,
                port: "api".into(),
                method: "status".into(),
                input: json!({"job_id": "j-1"}),
                output: json!({"Err": {"Http": {"status": 503, "message": "busy"}}}),
            },
        ];
        let api = ReplayingJobApi::new(CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }));

        let first = api.status("j-1").await.unwrap();
        assert_eq!(first.status, JobStatus::Running);
        assert_eq!(first.progress, Some(40.0));

        let second = api.status("j-1").await.unwrap_err();
        assert_eq!(second, ApiError::Http { status: 503, message: "busy".into() });
    }
}
