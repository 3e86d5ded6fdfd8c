//! Clock port for obtaining the current time and waiting.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Boxed future returned by [`Clock::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Provides the current time and timer waits.
///
/// Abstracting time allows deterministic replay and lets tests drive the
/// poll loop without real delays.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Completes after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}
