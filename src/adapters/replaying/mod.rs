//! Replaying adapters that serve recorded interactions.

pub mod api;
pub mod clock;
pub mod filesystem;

pub use api::ReplayingJobApi;
pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Output of the next recorded `port::method` interaction.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Next recorded output, decoded as `T`.
///
/// # Panics
///
/// Panics if the cassette has no such interaction or it does not decode as `T`.
pub(crate) fn replay_value<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> T {
    let output = next_output(replayer, port, method);
    serde_json::from_value(output)
        .unwrap_or_else(|e| panic!("{port}::{method}: cassette output does not decode: {e}"))
}

/// Next recorded `{"Ok": ..}` / `{"Err": "message"}` output with a boxed error.
pub(crate) fn replay_result<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let recorded: Result<T, String> = replay_value(replayer, port, method);
    recorded.map_err(Into::into)
}
