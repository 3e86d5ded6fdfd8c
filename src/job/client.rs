//! Submits inputs, watches the resulting job and assembles its dashboard.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use super::error::JobError;
use super::policy::PollPolicy;
use super::state::{Job, LifecycleState};
use super::tracker::JobTracker;
use crate::context::ServiceContext;
use crate::dashboard::{assemble_for_job, DashboardModel};
use crate::ports::job_api::{ApiFuture, InputFile, JobStatus};

/// Id given to jobs the service completed during submission without naming them.
pub const INLINE_JOB_ID: &str = "inline";

/// Outcome of a successful submission.
#[derive(Debug)]
pub enum Submission {
    /// The service accepted the input as an asynchronous job.
    Queued(JobHandle),
    /// The service answered with results directly.
    Completed(Job),
}

/// A queued job plus the token that stops its watcher.
#[derive(Debug, Clone)]
pub struct JobHandle {
    job: Job,
    token: CancellationToken,
}

impl JobHandle {
    /// Server-assigned job id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.job.id
    }

    /// Token observed by the watcher of this job.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stops future polls. A call already in flight still completes.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Drives one job at a time through submit, poll and result fetch.
pub struct JobLifecycleClient<'a> {
    ctx: &'a ServiceContext,
    policy: PollPolicy,
    tracker: JobTracker,
}

impl<'a> JobLifecycleClient<'a> {
    /// Creates an idle client over the context's ports.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, policy: PollPolicy) -> Self {
        Self { ctx, policy, tracker: JobTracker::new() }
    }

    /// Lifecycle state of the current job.
    ///
    /// A watch that ends without a terminal status leaves it `Stopped`.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.tracker.state()
    }

    /// Id of the current job, once assigned.
    #[must_use]
    pub fn active_job_id(&self) -> Option<String> {
        self.tracker.active_id()
    }

    /// Stops watching the current job. Has no effect once it has finished.
    pub fn cancel(&self) {
        self.tracker.cancel_active();
    }

    /// Uploads the inputs as one submission.
    ///
    /// Submitting again while a job is being watched supersedes that job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Submission`] if the call fails, the service
    /// rejects the input, or the response names neither a job nor results.
    pub async fn submit(&self, inputs: &[InputFile]) -> Result<Submission, JobError> {
        self.tracker.begin_submission();
        tracing::info!(files = inputs.len(), "submitting inputs");

        let response = match self.ctx.api.submit(inputs).await {
            Ok(response) => response,
            Err(e) => {
                self.tracker.reset();
                tracing::error!(error = %e, "submission failed");
                return Err(JobError::Submission(e.to_string()));
            }
        };

        if !response.success {
            self.tracker.reset();
            let message = response
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "the service rejected the submission".to_string());
            tracing::error!(error = %message, "submission rejected");
            return Err(JobError::Submission(message));
        }

        let now = self.ctx.clock.now();
        if response.payload.modernization_assets.is_some() {
            let id = response.job_id.unwrap_or_else(|| INLINE_JOB_ID.to_string());
            self.tracker.track(&id, LifecycleState::Completed);
            tracing::info!(job_id = %id, "service completed job during submission");
            return Ok(Submission::Completed(Job::completed(id, response.payload, now)));
        }

        match response.job_id {
            Some(id) => {
                let token = self.tracker.track(&id, LifecycleState::Queued);
                tracing::info!(job_id = %id, "job queued");
                Ok(Submission::Queued(JobHandle { job: Job::queued(id, now), token }))
            }
            None => {
                self.tracker.reset();
                Err(JobError::Submission(
                    "response carried neither a job id nor results".to_string(),
                ))
            }
        }
    }

    /// Polls the job until it completes, fails, is cancelled or exceeds the bounds.
    ///
    /// The first status fetch happens one interval after the call. On
    /// `completed` the result is fetched exactly once, even if the job is
    /// cancelled meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Failed`] when the service reports failure,
    /// [`JobError::Connection`] when fetches keep failing,
    /// [`JobError::TimedOut`] when the bounds are exceeded and
    /// [`JobError::Cancelled`] when the handle's token fires.
    pub async fn watch(&self, handle: &JobHandle) -> Result<Job, JobError> {
        let outcome = self.poll(handle).await;
        if matches!(
            outcome,
            Err(JobError::Cancelled { .. } | JobError::Connection { .. } | JobError::TimedOut { .. })
        ) {
            self.tracker.stop(handle.id());
        }
        outcome
    }

    async fn poll(&self, handle: &JobHandle) -> Result<Job, JobError> {
        let mut job = handle.job.clone();
        let token = &handle.token;
        let started = self.ctx.clock.now();
        let mut ticks: u32 = 0;

        loop {
            if job.status == JobStatus::Failed {
                return Err(self.failed(&job));
            }
            if job.status == JobStatus::Completed {
                return self.fetch_result(job).await;
            }

            self.check_bounds(&job.id, ticks, started)?;
            if !self.pause(token, self.policy.interval).await {
                tracing::info!(job_id = %job.id, "stopped watching job");
                return Err(JobError::Cancelled { job_id: job.id });
            }
            self.check_bounds(&job.id, ticks, started)?;

            let id = job.id.clone();
            let response = self.with_retry(&id, Some(token), || self.ctx.api.status(&id)).await?;
            ticks += 1;

            job = job.observe(&response, self.ctx.clock.now());
            self.tracker.update(&job.id, job.status.into());
            tracing::debug!(
                job_id = %job.id,
                status = ?job.status,
                progress = job.progress,
                tick = ticks,
                "polled job status"
            );
        }
    }

    /// Submits, watches and assembles the dashboard for the finished job.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::submit`] or [`Self::watch`].
    pub async fn run(&self, inputs: &[InputFile]) -> Result<DashboardModel, JobError> {
        let job = match self.submit(inputs).await? {
            Submission::Completed(job) => job,
            Submission::Queued(handle) => self.watch(&handle).await?,
        };
        let payload = job.result.unwrap_or_default();
        Ok(assemble_for_job(&payload, &job.id))
    }

    async fn fetch_result(&self, job: Job) -> Result<Job, JobError> {
        if job.result.is_some() {
            return Ok(job);
        }
        let id = job.id.clone();
        let payload = self.with_retry(&id, None, || self.ctx.api.result(&id)).await?;
        let job = job.with_result(payload, self.ctx.clock.now());
        tracing::info!(job_id = %job.id, "job completed");
        Ok(job)
    }

    fn failed(&self, job: &Job) -> JobError {
        let message = job.failure_message();
        tracing::error!(job_id = %job.id, error = %message, "job failed");
        JobError::Failed { job_id: job.id.clone(), message }
    }

    fn check_bounds(&self, job_id: &str, ticks: u32, started: DateTime<Utc>) -> Result<(), JobError> {
        let elapsed = (self.ctx.clock.now() - started).to_std().unwrap_or_default();
        if self.policy.exhausted(ticks, elapsed) {
            tracing::error!(job_id, ticks, elapsed_secs = elapsed.as_secs(), "gave up waiting for job");
            return Err(JobError::TimedOut { job_id: job_id.to_string(), ticks, elapsed });
        }
        Ok(())
    }

    /// Sleeps for `duration`. Returns `false` if `token` fired first.
    async fn pause(&self, token: &CancellationToken, duration: Duration) -> bool {
        if token.is_cancelled() {
            return false;
        }
        tokio::select! {
            biased;
            () = token.cancelled() => false,
            () = self.ctx.clock.sleep(duration) => !token.is_cancelled(),
        }
    }

    /// Repeats `call` with backoff while it fails with a retryable error.
    ///
    /// Without a token the backoff sleeps cannot be interrupted.
    async fn with_retry<'f, T>(
        &self,
        job_id: &str,
        token: Option<&CancellationToken>,
        mut call: impl FnMut() -> ApiFuture<'f, T>,
    ) -> Result<T, JobError> {
        let retry = &self.policy.retry;
        let mut attempt: u32 = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                    let delay = retry.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        job_id,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "fetch failed, retrying"
                    );
                    let proceed = match token {
                        Some(token) => self.pause(token, delay).await,
                        None => {
                            self.ctx.clock.sleep(delay).await;
                            true
                        }
                    };
                    if !proceed {
                        return Err(JobError::Cancelled { job_id: job_id.to_string() });
                    }
                }
                Err(e) => {
                    tracing::error!(job_id, error = %e, "giving up on job service");
                    return Err(JobError::Connection { job_id: job_id.to_string(), source: e });
                }
            }
        }
    }
}
