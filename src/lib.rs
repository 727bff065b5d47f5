#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod collector;
pub mod commands;
pub mod config;
pub mod discover;
pub mod errors;
pub mod models;
pub mod observer;
pub mod output;
pub mod payload;
pub mod report;
pub mod runner;

use std::process::ExitCode;

use anyhow::Result;

use cli::{Cli, Commands, RunArgs};
use config::RunnerConfig;
use output::Output;
use runner::RunResult;

pub use collector::JsonCollector;
pub use config::{DEFAULT_PATTERN, DEFAULT_REPORT_PATH};
pub use discover::discover;
pub use models::{Completion, TestCase, TestOutcome, TestStatus};
pub use observer::{Observer, TextObserver};
pub use runner::{JsonRunner, RunSummary};

/// Exit status when at least one test failed or errored.
pub const EXIT_TESTS_FAILED: u8 = 1;
/// Exit status when the run itself could not complete.
pub const EXIT_RUN_ERROR: u8 = 2;

fn verdict(result: &RunResult) -> ExitCode {
    if result.was_successful() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_TESTS_FAILED)
    }
}

fn finish_run(result: &RunResult, config: &RunnerConfig, args: &RunArgs) -> Result<ExitCode> {
    Output::new(args.json).report_written(result, &config.output)?;
    Ok(verdict(result))
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            root,
            pattern,
            config,
            args,
        } => {
            let config = commands::run::resolve_config(&root, config.as_deref(), pattern, &args)?;
            let result = commands::run::run(&root, config.clone())?;
            finish_run(&result, &config, &args)
        }
        Commands::List {
            root,
            pattern,
            json,
        } => {
            let tests = commands::list::run(&root, pattern)?;
            Output::new(json).test_list(&tests, &root)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Demo { args } => {
            let mut config = RunnerConfig::default();
            commands::run::apply_overrides(&mut config, &args);
            let result = commands::run::execute(&payload::demo_suite(), config.clone())?;
            finish_run(&result, &config, &args)
        }
        Commands::Greet { name } => {
            Output::new(false).greeting(&payload::greet(&name))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Encode { files, json } => {
            let encoded = payload::encode_files(&files)?;
            Output::new(json).encoded_files(&encoded)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
