//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::api::LiveJobApi;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::recording::{RecordingClock, RecordingFileSystem, RecordingJobApi};
use crate::adapters::replaying::{ReplayingClock, ReplayingFileSystem, ReplayingJobApi};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::payload::ResultPayload;
use crate::ports::clock::{Clock, SleepFuture};
use crate::ports::filesystem::FileSystem;
use crate::ports::job_api::{ApiFuture, InputFile, JobApi, StatusResponse, SubmitResponse};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Job service client.
    pub api: Box<dyn JobApi>,
    /// Clock for timestamps and poll waits.
    pub clock: Box<dyn Clock>,
    /// Filesystem for reading inputs and writing exports.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(api: Box<dyn JobApi>, clock: Box<dyn Clock>, fs: Box<dyn FileSystem>) -> Self {
        Self { api, clock, fs }
    }

    /// Creates a live context talking to the configured job service.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self::new(
            Box::new(LiveJobApi::new(settings.server_url.as_str())),
            Box::new(LiveClock),
            Box::new(LiveFileSystem),
        )
    }

    /// Creates a live context whose calls are also recorded under `root`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(
        root: &Path,
        settings: &Settings,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(root)?;
        let live = Self::live(settings);
        let ctx = Self::new(
            Box::new(RecordingJobApi::new(live.api, session.api.clone())),
            Box::new(RecordingClock::new(live.clock, session.clock.clone())),
            Box::new(RecordingFileSystem::new(live.fs, session.fs.clone())),
        );
        Ok((ctx, session))
    }

    /// Creates a replaying context from the cassettes a recording session wrote to `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette file cannot be read or parsed.
    pub fn replaying(dir: &Path) -> Result<Self, String> {
        Self::replaying_from(&CassetteConfig::from_dir(dir))
    }

    /// Creates a replaying context from per-port cassettes.
    ///
    /// Ports without a cassette panic when called.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self::new(
            match replayers.api {
                Some(r) => Box::new(ReplayingJobApi::new(r)),
                None => Box::new(PanickingJobApi),
            },
            match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
        ))
    }
}

// --- Panicking adapters for ports without a cassette ---

struct PanickingJobApi;
impl JobApi for PanickingJobApi {
    fn submit<'a>(&'a self, _files: &'a [InputFile]) -> ApiFuture<'a, SubmitResponse> {
        panic!("api::submit called but no api cassette was configured")
    }
    fn status<'a>(&'a self, _job_id: &'a str) -> ApiFuture<'a, StatusResponse> {
        panic!("api::status called but no api cassette was configured")
    }
    fn result<'a>(&'a self, _job_id: &'a str) -> ApiFuture<'a, ResultPayload> {
        panic!("api::result called but no api cassette was configured")
    }
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("clock::now called but no clock cassette was configured")
    }
    fn sleep(&self, _duration: std::time::Duration) -> SleepFuture<'_> {
        panic!("clock::sleep called but no clock cassette was configured")
    }
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        panic!("fs::read_to_string called but no fs cassette was configured")
    }
    fn read_bytes(&self, _path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("fs::read_bytes called but no fs cassette was configured")
    }
    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("fs::write called but no fs cassette was configured")
    }
    fn exists(&self, _path: &Path) -> bool {
        panic!("fs::exists called but no fs cassette was configured")
    }
}
