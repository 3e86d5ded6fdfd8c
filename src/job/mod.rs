//! Asynchronous job lifecycle: submit, poll to a terminal state, fetch the result.

pub mod client;
pub mod error;
pub mod policy;
pub mod state;
pub mod tracker;

pub use client::{JobHandle, JobLifecycleClient, Submission, INLINE_JOB_ID};
pub use error::JobError;
pub use policy::{PollPolicy, RetryPolicy};
pub use state::{Job, LifecycleState, GENERIC_FAILURE};
pub use tracker::JobTracker;
