//! Runtime settings read from the environment.
//!
//! `main` loads `.env` with `dotenvy` before anything reads these, so a
//! project-local `.env` and real environment variables behave the same.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::job::{PollPolicy, RetryPolicy};

/// Default job service base URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";
/// Default log filter.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// A setting that is present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The value does not parse.
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}

/// Resolved settings. CLI flags override individual fields afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Job service base URL (`MODASH_SERVER_URL`).
    pub server_url: String,
    /// Wait between status polls (`MODASH_POLL_INTERVAL_MS`).
    pub poll_interval: Duration,
    /// Give up watching after this long (`MODASH_MAX_POLL_SECS`, `0` disables).
    pub max_poll_duration: Option<Duration>,
    /// Give up after this many polls (`MODASH_MAX_POLL_TICKS`).
    pub max_poll_ticks: Option<u32>,
    /// Retries per failed fetch (`MODASH_RETRY_MAX`, `0` by default).
    pub retry_max: u32,
    /// First retry delay (`MODASH_RETRY_INITIAL_MS`).
    pub retry_initial_delay: Duration,
    /// `tracing` filter directive (`MODASH_LOG`).
    pub log_filter: String,
    /// Cassette output directory, when recording (`MODASH_RECORD`).
    pub record_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let poll = PollPolicy::default();
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: poll.interval,
            max_poll_duration: poll.max_duration,
            max_poll_ticks: poll.max_ticks,
            retry_max: poll.retry.max_retries,
            retry_initial_delay: poll.retry.initial_delay,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            record_dir: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; unset or empty variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(url) = get("MODASH_SERVER_URL") {
            settings.server_url = parse_url("MODASH_SERVER_URL", url)?;
        }
        if let Some(ms) = get("MODASH_POLL_INTERVAL_MS") {
            let ms = parse_u64("MODASH_POLL_INTERVAL_MS", ms)?;
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    key: "MODASH_POLL_INTERVAL_MS",
                    value: "0".to_string(),
                    reason: "must be greater than zero",
                });
            }
            settings.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = get("MODASH_MAX_POLL_SECS") {
            let secs = parse_u64("MODASH_MAX_POLL_SECS", secs)?;
            settings.max_poll_duration = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(ticks) = get("MODASH_MAX_POLL_TICKS") {
            settings.max_poll_ticks = Some(parse_u32("MODASH_MAX_POLL_TICKS", ticks)?);
        }
        if let Some(max) = get("MODASH_RETRY_MAX") {
            settings.retry_max = parse_u32("MODASH_RETRY_MAX", max)?;
        }
        if let Some(ms) = get("MODASH_RETRY_INITIAL_MS") {
            settings.retry_initial_delay =
                Duration::from_millis(parse_u64("MODASH_RETRY_INITIAL_MS", ms)?);
        }
        if let Some(filter) = get("MODASH_LOG") {
            settings.log_filter = filter;
        }
        settings.record_dir = get("MODASH_RECORD").map(PathBuf::from);

        Ok(settings)
    }

    /// Replaces the server URL with `url`, validated like `MODASH_SERVER_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an http(s) URL.
    pub fn with_server_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.server_url = parse_url("--server", url.trim().to_string())?;
        Ok(self)
    }

    /// Poll policy built from these settings.
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_duration: self.max_poll_duration,
            max_ticks: self.max_poll_ticks,
            retry: RetryPolicy {
                max_retries: self.retry_max,
                initial_delay: self.retry_initial_delay,
                ..RetryPolicy::default()
            },
        }
    }
}

fn parse_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::Invalid { key, value, reason: "expected an http:// or https:// URL" })
    }
}

fn parse_u64(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value, reason: "expected a whole number" })
}

fn parse_u32(key: &'static str, value: String) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value, reason: "expected a whole number" })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.server_url, "http://localhost:3001");
        assert_eq!(s.poll_interval, Duration::from_secs(2));
        assert_eq!(s.max_poll_duration, Some(Duration::from_secs(600)));
        assert_eq!(s.max_poll_ticks, None);
        assert_eq!(s.retry_max, 0);
        assert_eq!(s.poll_policy(), PollPolicy::default());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("MODASH_SERVER_URL", "https://gen.example.com/"),
            ("MODASH_POLL_INTERVAL_MS", "250"),
            ("MODASH_MAX_POLL_SECS", "0"),
            ("MODASH_MAX_POLL_TICKS", "40"),
            ("MODASH_RETRY_MAX", "4"),
            ("MODASH_RETRY_INITIAL_MS", "50"),
            ("MODASH_LOG", "modash=debug"),
            ("MODASH_RECORD", "cassettes"),
        ])
        .unwrap();

        assert_eq!(s.server_url, "https://gen.example.com");
        assert_eq!(s.poll_interval, Duration::from_millis(250));
        assert_eq!(s.max_poll_duration, None);
        assert_eq!(s.max_poll_ticks, Some(40));
        assert_eq!(s.log_filter, "modash=debug");
        assert_eq!(s.record_dir, Some(PathBuf::from("cassettes")));

        let policy = s.poll_policy();
        assert_eq!(policy.retry.max_retries, 4);
        assert_eq!(policy.retry.initial_delay, Duration::from_millis(50));
        assert_eq!(policy.retry.max_delay, Duration::from_secs(30));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let s = settings(&[("MODASH_SERVER_URL", "  "), ("MODASH_LOG", "")]).unwrap();
        assert_eq!(s.server_url, DEFAULT_SERVER_URL);
        assert_eq!(s.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn rejects_unusable_values() {
        let err = settings(&[("MODASH_POLL_INTERVAL_MS", "soon")]).unwrap_err();
        assert_eq!(err.to_string(), "MODASH_POLL_INTERVAL_MS=\"soon\" is invalid: expected a whole number");

        assert!(settings(&[("MODASH_POLL_INTERVAL_MS", "0")]).is_err());
        assert!(settings(&[("MODASH_SERVER_URL", "localhost:3001")]).is_err());
        assert!(settings(&[("MODASH_RETRY_MAX", "-1")]).is_err());
    }

    #[test]
    fn server_override_is_validated() {
        let s = Settings::default().with_server_url("https://gen:8443/").unwrap();
        assert_eq!(s.server_url, "https://gen:8443");

        let err = Settings::default().with_server_url("gen:8443").unwrap_err();
        assert_eq!(
            err.to_string(),
            "--server=\"gen:8443\" is invalid: expected an http:// or https:// URL"
        );
    }
}
