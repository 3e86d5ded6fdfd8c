//! Record-replay round trip of a whole job run.
//!
//! 1. Run a job through recording adapters wrapped around a scripted
//!    service, a stepping clock and the real filesystem.
//! 2. Replay the cassettes with `ServiceContext::replaying()`.
//! 3. Assert the replayed dashboard equals the recorded one, twice.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use modash::adapters::live::filesystem::LiveFileSystem;
use modash::adapters::recording::{RecordingClock, RecordingFileSystem, RecordingJobApi};
use modash::cassette::format::Cassette;
use modash::cassette::session::RecordingSession;
use modash::commands::submit::load_inputs;
use modash::context::ServiceContext;
use modash::dashboard::DashboardModel;
use modash::job::{JobLifecycleClient, PollPolicy, RetryPolicy};
use modash::payload::ResultPayload;
use modash::ports::{
    ApiError, ApiFuture, Clock, InputFile, JobApi, JobStatus, SleepFuture, StatusResponse,
    SubmitResponse,
};

struct ScriptedService {
    statuses: Mutex<VecDeque<Result<StatusResponse, ApiError>>>,
}

impl JobApi for ScriptedService {
    fn submit<'a>(&'a self, _files: &'a [InputFile]) -> ApiFuture<'a, SubmitResponse> {
        Box::pin(async {
            Ok(SubmitResponse {
                success: true,
                job_id: Some("job-rr".into()),
                ..SubmitResponse::default()
            })
        })
    }

    fn status<'a>(&'a self, _job_id: &'a str) -> ApiFuture<'a, StatusResponse> {
        Box::pin(async move { self.statuses.lock().unwrap().pop_front().expect("no status left") })
    }

    fn result<'a>(&'a self, _job_id: &'a str) -> ApiFuture<'a, ResultPayload> {
        Box::pin(async {
            Ok(serde_json::from_value(json!({
                "modernizationAssets": {
                    "sqlSchema": "CREATE TABLE accounts (id SERIAL PRIMARY KEY, owner TEXT NOT NULL);",
                    "apiRoutes": "app.get(\"/api/accounts\", list);",
                    "metrics": {"linesGenerated": 312}
                },
                "parsedSchema": {"recordName": "ACCOUNT", "fieldCount": 2}
            }))
            .unwrap())
        })
    }
}

struct SteppingClock(Mutex<DateTime<Utc>>);

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(async move {
            *self.0.lock().unwrap() += chrono::Duration::from_std(duration).unwrap();
        })
    }
}

fn write_inputs(dir: &Path) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    let copybook = dir.join("ACCOUNT.cpy");
    let data = dir.join("ACCOUNT.dat");
    std::fs::write(&copybook, "01 ACCOUNT.\n   05 ACCOUNT-ID PIC 9(6).\n").unwrap();
    std::fs::write(&data, "000001SMITH").unwrap();
    vec![copybook, data]
}

async fn run_job(ctx: &ServiceContext, files: &[PathBuf]) -> DashboardModel {
    let inputs = load_inputs(ctx, files).unwrap();
    let policy = PollPolicy {
        interval: Duration::from_millis(500),
        retry: RetryPolicy::backoff(1),
        ..PollPolicy::default()
    };
    JobLifecycleClient::new(ctx, policy).run(&inputs).await.unwrap()
}

#[tokio::test]
async fn record_then_replay_produces_identical_dashboards() {
    let root = std::env::temp_dir().join("modash_record_replay_test");
    let _ = std::fs::remove_dir_all(&root);
    let files = write_inputs(&root.join("inputs"));

    // --- Phase 1: record ---
    let session = RecordingSession::new_in(&root.join("cassettes")).unwrap();
    let service = ScriptedService {
        statuses: Mutex::new(VecDeque::from([
            Ok(StatusResponse::bare(JobStatus::Queued)),
            Err(ApiError::Http { status: 502, message: "bad gateway".into() }),
            Ok(StatusResponse { progress: Some(50.0), ..StatusResponse::bare(JobStatus::Running) }),
            Ok(StatusResponse::bare(JobStatus::Completed)),
        ])),
    };
    let ctx = ServiceContext::new(
        Box::new(RecordingJobApi::new(Box::new(service), session.api.clone())),
        Box::new(RecordingClock::new(
            Box::new(SteppingClock(Mutex::new(Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0).unwrap()))),
            session.clock.clone(),
        )),
        Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), session.fs.clone())),
    );
    let recorded = run_job(&ctx, &files).await;
    drop(ctx);
    let dir = session.finish().unwrap();

    assert_eq!(recorded.job_id.as_deref(), Some("job-rr"));
    assert_eq!(recorded.schema.tables[0].name, "accounts");
    assert_eq!(recorded.metrics.auxiliary["linesGenerated"], json!(312));

    let api = Cassette::load(&dir.join("api.cassette.yaml")).unwrap();
    let methods: Vec<&str> = api.interactions.iter().map(|i| i.method.as_str()).collect();
    assert_eq!(methods, vec!["submit", "status", "status", "status", "status", "result"]);
    assert_eq!(api.interactions[0].input["files"][0]["part"], json!("copybook"));

    // Input files are gone during replay; only the cassettes matter.
    std::fs::remove_dir_all(root.join("inputs")).unwrap();

    // --- Phase 2: replay ---
    let first = run_job(&ServiceContext::replaying(&dir).unwrap(), &files).await;
    assert_eq!(first, recorded);

    // --- Phase 3: replay again for determinism ---
    let second = run_job(&ServiceContext::replaying(&dir).unwrap(), &files).await;
    assert_eq!(second, first);

    let _ = std::fs::remove_dir_all(&root);
}
