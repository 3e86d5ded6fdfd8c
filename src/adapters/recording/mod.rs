//! Recording adapters that capture interactions to cassettes.

pub mod api;
pub mod clock;
pub mod filesystem;

pub use api::RecordingJobApi;
pub use clock::RecordingClock;
pub use filesystem::RecordingFileSystem;

use serde::Serialize;

use crate::cassette::session::SharedRecorder;

/// Records one call whose output serializes as-is.
///
/// `Result<T, ApiError>` outputs land in the cassette as `{"Ok": ..}` or
/// `{"Err": ..}` through serde's own `Result` encoding.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize + ?Sized,
    O: Serialize + ?Sized,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Records a call with a boxed error, keeping only the error's message.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize + ?Sized,
{
    let output: Result<&T, String> = result.as_ref().map_err(ToString::to_string);
    record_interaction(recorder, port, method, input, &output);
}
