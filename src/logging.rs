//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Installs a compact stderr subscriber filtered by `filter`.
///
/// An unparsable filter falls back to `info`. Later calls are no-ops, so
/// tests and repeated `run` invocations can call this freely.
pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_tracing("modash=debug");
        init_tracing("not a [valid filter");
        tracing::debug!("still logging");
    }
}
