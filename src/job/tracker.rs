//! Single-active-job bookkeeping.
//!
//! The tracker holds the cancellation token of the job currently being
//! watched. Tracking a different job cancels the previous watcher, so two
//! poll loops never drive the same client. Supersession only stops local
//! observation; the service keeps running the superseded job.

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use super::state::LifecycleState;

struct Active {
    job_id: Option<String>,
    state: LifecycleState,
    token: CancellationToken,
}

/// Tracks the one job a client is currently responsible for.
#[derive(Default)]
pub struct JobTracker {
    active: Mutex<Option<Active>>,
}

impl JobTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a submission as in flight, cancelling any watcher still running.
    pub fn begin_submission(&self) {
        let mut active = self.active.lock().expect("tracker lock poisoned");
        if let Some(previous) = active.take() {
            previous.token.cancel();
        }
        *active = Some(Active {
            job_id: None,
            state: LifecycleState::Submitted,
            token: CancellationToken::new(),
        });
    }

    /// Makes `job_id` the active job and returns the token its watcher observes.
    ///
    /// Tracking the already active job keeps its token; tracking another job
    /// cancels the previous one.
    pub fn track(&self, job_id: &str, state: LifecycleState) -> CancellationToken {
        let mut active = self.active.lock().expect("tracker lock poisoned");
        match active.as_mut() {
            Some(current) if current.job_id.as_deref() == Some(job_id) => {
                current.state = state;
                current.token.clone()
            }
            Some(current) if current.job_id.is_none() && !current.token.is_cancelled() => {
                current.job_id = Some(job_id.to_string());
                current.state = state;
                current.token.clone()
            }
            _ => {
                if let Some(previous) = active.take() {
                    tracing::info!(
                        superseded = previous.job_id.as_deref().unwrap_or("<pending>"),
                        job_id,
                        "superseding active job"
                    );
                    previous.token.cancel();
                }
                let token = CancellationToken::new();
                *active = Some(Active {
                    job_id: Some(job_id.to_string()),
                    state,
                    token: token.clone(),
                });
                token
            }
        }
    }

    /// Records a state change for `job_id`. Ignored if another job is active.
    pub fn update(&self, job_id: &str, state: LifecycleState) {
        let mut active = self.active.lock().expect("tracker lock poisoned");
        if let Some(current) = active.as_mut() {
            if current.job_id.as_deref() == Some(job_id) {
                current.state = state;
            }
        }
    }

    /// Marks `job_id` as no longer watched unless it already finished.
    pub fn stop(&self, job_id: &str) {
        let mut active = self.active.lock().expect("tracker lock poisoned");
        if let Some(current) = active.as_mut() {
            if current.job_id.as_deref() == Some(job_id) && !current.state.is_terminal() {
                current.state = LifecycleState::Stopped;
            }
        }
    }

    /// Returns to idle after a submission that created no job.
    pub fn reset(&self) {
        let mut active = self.active.lock().expect("tracker lock poisoned");
        if let Some(previous) = active.take() {
            previous.token.cancel();
        }
    }

    /// Cancels the active watcher, if any. Finished jobs are left alone.
    pub fn cancel_active(&self) {
        let active = self.active.lock().expect("tracker lock poisoned");
        if let Some(current) = active.as_ref().filter(|c| !c.state.is_terminal()) {
            current.token.cancel();
        }
    }

    /// State of the active job, or `Idle`.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        let active = self.active.lock().expect("tracker lock poisoned");
        active.as_ref().map_or(LifecycleState::Idle, |current| current.state)
    }

    /// Id of the active job, once the service has assigned one.
    #[must_use]
    pub fn active_id(&self) -> Option<String> {
        let active = self.active.lock().expect("tracker lock poisoned");
        active.as_ref().and_then(|current| current.job_id.clone())
    }
}
