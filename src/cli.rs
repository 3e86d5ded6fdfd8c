//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `modash`.
#[derive(Debug, Parser)]
#[command(
    name = "modash",
    version,
    about = "Turn generated SQL and route code into a modernization dashboard"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse SQL DDL and print the recovered schema as JSON.
    Schema {
        /// File containing `CREATE TABLE` statements.
        file: PathBuf,
    },
    /// Extract route registrations and print the endpoints as JSON.
    Endpoints {
        /// Route source file.
        file: PathBuf,
    },
    /// Build a dashboard model from a saved job result.
    Assemble {
        /// JSON result payload (`modernizationAssets`, `parsedSchema`).
        result: PathBuf,
        /// Write the model here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload inputs, wait for the job and export its dashboard model.
    Submit {
        /// Input files; `.cpy` and `.dat` are sent as copybook and datafile.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Job service base URL.
        #[arg(long)]
        server: Option<String>,
        /// Write the model here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Milliseconds between status polls.
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Give up after this many seconds; `0` waits indefinitely.
        #[arg(long)]
        max_wait_secs: Option<u64>,
    },
    /// Print the current status of a job.
    Status {
        /// Job id returned by a submission.
        job_id: String,
        /// Job service base URL.
        #[arg(long)]
        server: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_schema_subcommand() {
        let cli = Cli::parse_from(["modash", "schema", "ddl.sql"]);
        assert!(matches!(cli.command, Command::Schema { file } if file.ends_with("ddl.sql")));
    }

    #[test]
    fn parses_submit_with_overrides() {
        let cli = Cli::parse_from([
            "modash",
            "submit",
            "CUSTOMER.cpy",
            "CUSTOMER.dat",
            "--server",
            "http://gen:3001",
            "-o",
            "dash.json",
            "--interval-ms",
            "500",
            "--max-wait-secs",
            "0",
        ]);
        let Command::Submit { files, server, output, interval_ms, max_wait_secs } = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(server.as_deref(), Some("http://gen:3001"));
        assert!(output.is_some());
        assert_eq!(interval_ms, Some(500));
        assert_eq!(max_wait_secs, Some(0));
    }

    #[test]
    fn submit_requires_files() {
        assert!(Cli::try_parse_from(["modash", "submit"]).is_err());
    }

    #[test]
    fn parses_status_subcommand() {
        let cli = Cli::parse_from(["modash", "status", "job-42"]);
        assert!(matches!(cli.command, Command::Status { job_id, server: None } if job_id == "job-42"));
    }
}
