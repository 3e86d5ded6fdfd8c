//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::cassette_file_name;
use super::recorder::CassetteRecorder;

/// Shared handle to one port's recorder.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// One recorder per port, all writing into a timestamped directory.
pub struct RecordingSession {
    /// Job service recorder.
    pub api: SharedRecorder,
    /// Clock recorder.
    pub clock: SharedRecorder,
    /// Filesystem recorder.
    pub fs: SharedRecorder,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Starts a session writing to `<root>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new_in(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let commit = get_commit_hash();
        let make_recorder = |port: &str| -> SharedRecorder {
            let path = output_dir.join(cassette_file_name(port));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"), &commit)))
        };

        Ok(Self {
            api: make_recorder("api"),
            clock: make_recorder("clock"),
            fs: make_recorder("fs"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette. The recording adapters must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a write fails.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(recorder: SharedRecorder, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(recorder)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.api, "api")?;
        finish_one(self.clock, "clock")?;
        finish_one(self.fs, "fs")?;
        tracing::info!(dir = %self.output_dir.display(), "wrote cassettes");
        Ok(self.output_dir)
    }
}

/// Current git commit, or `unknown` outside a repository.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        tracing::warn!("could not read git commit hash, recording as 'unknown'");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use serde_json::json;

    #[test]
    fn writes_one_cassette_per_port() {
        let root = std::env::temp_dir().join("modash_session_test");
        let _ = std::fs::remove_dir_all(&root);

        let session = RecordingSession::new_in(&root).unwrap();
        assert!(session.output_dir().exists());
        session
            .api
            .lock()
            .unwrap()
            .record("api", "status", json!({"job_id": "j"}), json!({"Ok": {"status": "queued"}}));

        let dir = session.finish().unwrap();

        let api = Cassette::load(&dir.join("api.cassette.yaml")).unwrap();
        assert_eq!(api.interactions.len(), 1);
        let clock = Cassette::load(&dir.join("clock.cassette.yaml")).unwrap();
        assert!(clock.interactions.is_empty());
        assert!(dir.join("fs.cassette.yaml").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn finish_fails_while_an_adapter_holds_a_recorder() {
        let root = std::env::temp_dir().join("modash_session_held");
        let _ = std::fs::remove_dir_all(&root);

        let session = RecordingSession::new_in(&root).unwrap();
        let held = Arc::clone(&session.api);
        let err = session.finish().unwrap_err();
        assert!(err.contains("api still has references"));
        drop(held);

        let _ = std::fs::remove_dir_all(&root);
    }
}
