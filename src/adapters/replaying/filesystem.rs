//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{replay_result, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Serves recorded filesystem results from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a replaying filesystem over a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "read_to_string")
    }

    fn read_bytes(&self, _path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "read_bytes")
    }

    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "write")
    }

    fn exists(&self, _path: &Path) -> bool {
        replay_value(&self.replayer, "fs", "exists")
    }
}
