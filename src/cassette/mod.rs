//! Cassettes: YAML files of recorded port interactions.
//!
//! A recording session wraps each live adapter so that every call is
//! appended to its port's cassette. Replaying adapters serve the same
//! calls back in order, which lets whole job runs be tested offline.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

/// Ports that can be recorded and replayed.
pub const PORTS: [&str; 3] = ["api", "clock", "fs"];

/// File name of a port's cassette inside a cassette directory.
#[must_use]
pub fn cassette_file_name(port: &str) -> String {
    format!("{port}.cassette.yaml")
}
