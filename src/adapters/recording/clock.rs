//! Recording adapter for the `Clock` port.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record_interaction;
use crate::cassette::session::SharedRecorder;
use crate::ports::clock::{Clock, SleepFuture};

/// Records clock readings and waits while delegating to an inner clock.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: SharedRecorder,
}

impl RecordingClock {
    /// Wraps `inner`, appending every call to `recorder`.
    pub fn new(inner: Box<dyn Clock>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct SleepInput {
    millis: u64,
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let result = self.inner.now();
        record_interaction(&self.recorder, "clock", "now", &(), &result);
        result
    }

    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(async move {
            self.inner.sleep(duration).await;
            let input = SleepInput { millis: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX) };
            record_interaction(&self.recorder, "clock", "sleep", &input, &());
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::adapters::live::clock::LiveClock;
    use crate::cassette::format::Cassette;
    use crate::cassette::recorder::CassetteRecorder;

    #[tokio::test]
    async fn records_now_and_sleep() {
        let dir = std::env::temp_dir().join("modash_rec_clock_test");
        let path = dir.join("clock.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));

        {
            let clock = RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder));
            let _ = clock.now();
            clock.sleep(Duration::from_millis(5)).await;
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&path).unwrap();
        let methods: Vec<&str> = cassette.interactions.iter().map(|i| i.method.as_str()).collect();
        assert_eq!(methods, vec!["now", "sleep"]);
        assert_eq!(cassette.interactions[1].input["millis"], 5);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
