use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jury::EXIT_RUN_ERROR;
use jury::cli::Cli;

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with list/JSON output on stdout.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    match jury::run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_RUN_ERROR)
        }
    }
}
