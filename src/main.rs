//! Binary entrypoint for the `modash` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // Recording is handled in commands::dispatch via MODASH_RECORD=<dir>.
    match modash::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
