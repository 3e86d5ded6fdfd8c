//! Core library for the `modash` CLI.
//!
//! Recovers a relational schema from generated SQL DDL, an endpoint list
//! from generated route code, and assembles both into a dashboard model.
//! The [`job`] client drives the asynchronous generation job that produces
//! those artifacts.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod endpoints;
pub mod job;
pub mod logging;
pub mod payload;
pub mod ports;
pub mod schema;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration or command
/// execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    let settings = config::Settings::from_env().map_err(|err| err.to_string())?;
    logging::init_tracing(&settings.log_filter);
    commands::dispatch(&cli.command, &settings)
}
