//! Cassette data structures.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded call to a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the cassette, assigned by the recorder.
    pub seq: u64,
    /// Port name: `api`, `clock` or `fs`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Call arguments.
    pub input: serde_json::Value,
    /// Returned value. Fallible calls use `{"Ok": ..}` / `{"Err": ..}`.
    pub output: serde_json::Value,
}

/// An ordered list of interactions plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit of the recording checkout, or `unknown`.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Interactions recorded for `port`.
    pub fn for_port<'a>(&'a self, port: &'a str) -> impl Iterator<Item = &'a Interaction> + 'a {
        self.interactions.iter().filter(move |i| i.port == port)
    }
}
