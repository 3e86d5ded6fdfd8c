//! Poll cadence, bounds and retry backoff.

use std::time::Duration;

/// Backoff applied to retryable status and result fetch failures.
///
/// The default never retries; callers opt in through `max_retries`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each retry.
    pub multiplier: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(1000),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    /// Exponential backoff with up to `max_retries` retries.
    #[must_use]
    pub fn backoff(max_retries: u32) -> Self {
        Self { max_retries, ..Self::default() }
    }

    /// Delay before retry number `retry` (zero-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// How often to poll and when to give up.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Wait between status fetches; also the wait before the first one.
    pub interval: Duration,
    /// Give up once this much time has passed since watching began.
    pub max_duration: Option<Duration>,
    /// Give up after this many status fetches.
    pub max_ticks: Option<u32>,
    /// Backoff for transient fetch failures.
    pub retry: RetryPolicy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_duration: Some(Duration::from_secs(600)),
            max_ticks: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl PollPolicy {
    /// Whether the bounds are exceeded after `ticks` fetches and `elapsed` time.
    #[must_use]
    pub fn exhausted(&self, ticks: u32, elapsed: Duration) -> bool {
        self.max_ticks.is_some_and(|max| ticks >= max)
            || self.max_duration.is_some_and(|max| elapsed >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.delay_for(0), Duration::from_secs(1));
        assert_eq!(retry.delay_for(1), Duration::from_secs(2));
        assert_eq!(retry.delay_for(3), Duration::from_secs(8));
        assert_eq!(retry.delay_for(10), Duration::from_secs(30));
        assert_eq!(retry.delay_for(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn bounds_are_optional() {
        let unbounded = PollPolicy { max_duration: None, ..PollPolicy::default() };
        assert!(!unbounded.exhausted(10_000, Duration::from_secs(86_400)));

        let ticks = PollPolicy { max_ticks: Some(3), max_duration: None, ..PollPolicy::default() };
        assert!(!ticks.exhausted(2, Duration::ZERO));
        assert!(ticks.exhausted(3, Duration::ZERO));

        assert!(PollPolicy::default().exhausted(0, Duration::from_secs(600)));
    }

    #[test]
    fn retry_is_opt_in() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::none());
        assert_eq!(PollPolicy::default().retry.max_retries, 0);
        assert_eq!(RetryPolicy::backoff(3).max_retries, 3);
        assert_eq!(RetryPolicy::backoff(3).initial_delay, Duration::from_secs(1));
    }
}
