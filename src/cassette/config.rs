//! Which cassette file backs which port during replay.

use std::path::{Path, PathBuf};

use super::cassette_file_name;
use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette paths. A port without a path panics if called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Job service cassette.
    pub api: Option<PathBuf>,
    /// Clock cassette.
    pub clock: Option<PathBuf>,
    /// Filesystem cassette.
    pub fs: Option<PathBuf>,
}

/// Loaded replayers, one per configured port.
#[derive(Debug)]
pub struct PortReplayers {
    /// Job service replayer.
    pub api: Option<CassetteReplayer>,
    /// Clock replayer.
    pub clock: Option<CassetteReplayer>,
    /// Filesystem replayer.
    pub fs: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Uses every `<port>.cassette.yaml` present in `dir`, as written by a recording session.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let find = |port: &str| {
            let path = dir.join(cassette_file_name(port));
            path.is_file().then_some(path)
        };
        Self { api: find("api"), clock: find("clock"), fs: find("fs") }
    }

    /// Loads every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| -> Result<Option<CassetteReplayer>, String> {
            path.as_deref()
                .map(|p| Cassette::load(p).map(|c| CassetteReplayer::new(&c)))
                .transpose()
        };
        Ok(PortReplayers { api: load(&self.api)?, clock: load(&self.clock)?, fs: load(&self.fs)? })
    }
}
