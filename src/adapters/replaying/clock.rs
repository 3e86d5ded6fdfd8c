//! Replaying adapter for the `Clock` port.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{next_output, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::{Clock, SleepFuture};

/// Serves recorded clock readings. Recorded waits return immediately.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a replaying clock over a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        replay_value(&self.replayer, "clock", "now")
    }

    fn sleep(&self, _duration: Duration) -> SleepFuture<'_> {
        Box::pin(async move {
            let _ = next_output(&self.replayer, "clock", "sleep");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    fn clock(interactions: Vec<(&str, serde_json::Value)>) -> ReplayingClock {
        let interactions = interactions
            .into_iter()
            .enumerate()
            .map(|(seq, (method, output))| Interaction {
                seq: seq as u64,
                port: "clock".into(),
                method: method.into(),
                input: json!({}),
                output,
            })
            .collect();
        ReplayingClock::new(CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }))
    }

    #[test]
    fn serves_recorded_times_in_order() {
        let clock = clock(vec![
            ("now", json!("2024-01-01T00:00:00Z")),
            ("now", json!("2024-01-01T00:01:00Z")),
        ]);
        let t1 = clock.now();
        let t2 = clock.now();
        assert_eq!(t1.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert!(t2 > t1);
    }

    #[tokio::test]
    async fn recorded_sleep_returns_without_waiting() {
        let clock = clock(vec![("sleep", json!(null))]);
        let start = std::time::Instant::now();
        clock.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
