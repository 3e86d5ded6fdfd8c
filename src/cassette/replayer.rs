//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette, one queue per port and method.
///
/// Calls to different methods may interleave freely; calls to the same
/// method must come in recorded order.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Creates a replayer over a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next interaction recorded for `port` and `method`.
    ///
    /// # Panics
    ///
    /// Panics with a "Cassette exhausted" message if no interaction is left
    /// for the pair. A replay that asks for more than was recorded means the
    /// code under test diverged from the recording.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for {port}::{method}. \
                 Recorded pairs: [{}]",
                available.join(", ")
            );
        };
        queue.pop_front().unwrap_or_else(|| {
            panic!("Cassette exhausted: every recorded {port}::{method} call was already replayed")
        })
    }

    /// Number of interactions not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "api".into(), method: method.into(), input: json!({}), output }
    }

    fn replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        })
    }

    #[test]
    fn methods_replay_independently_in_recorded_order() {
        let mut replayer = replayer(vec![
            interaction(0, "status", json!({"Ok": {"status": "queued"}})),
            interaction(1, "status", json!({"Ok": {"status": "completed"}})),
            interaction(2, "result", json!({"Ok": {}})),
        ]);
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_interaction("api", "result").seq, 2);
        assert_eq!(replayer.next_interaction("api", "status").seq, 0);
        assert_eq!(replayer.next_interaction("api", "status").seq, 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn replaying_past_the_recording_panics() {
        let mut replayer = replayer(vec![interaction(0, "status", json!({}))]);
        let _ = replayer.next_interaction("api", "status");
        let _ = replayer.next_interaction("api", "status");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded for clock::sleep")]
    fn unrecorded_method_panics() {
        let mut replayer = replayer(vec![interaction(0, "status", json!({}))]);
        let _ = replayer.next_interaction("clock", "sleep");
    }
}
