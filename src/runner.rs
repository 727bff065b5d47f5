use std::io::Write;

use console::Term;
use jiff::{SignedDuration, Timestamp};
use tracing::{info, warn};

use crate::collector::JsonCollector;
use crate::config::RunnerConfig;
use crate::errors::RunError;
use crate::models::{Completion, TestCase, TestOutcome};
use crate::observer::{Observer, TextObserver};
use crate::report::write_report;

/// The verdict of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    tests_run: usize,
    failures: usize,
    errors: usize,
    elapsed: SignedDuration,
}

impl RunSummary {
    pub fn new(tests_run: usize, failures: usize, errors: usize, elapsed: SignedDuration) -> Self {
        Self {
            tests_run,
            failures,
            errors,
            elapsed,
        }
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn elapsed(&self) -> SignedDuration {
        self.elapsed
    }

    /// True when no test failed or errored. An empty run is successful.
    pub fn was_successful(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

/// Verdict plus the ordered outcomes that were written to the report.
#[derive(Debug, Clone)]
pub struct RunResult {
    summary: RunSummary,
    outcomes: Vec<TestOutcome>,
}

impl RunResult {
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn was_successful(&self) -> bool {
        self.summary.was_successful()
    }
}

/// Runs each test in order and routes its terminal event to `observer`.
pub fn execute_suite<O: Observer>(suite: &[TestCase], observer: &mut O) {
    for test in suite {
        observer.start_test(test);
        match test.execute() {
            Completion::Passed => observer.on_success(test),
            Completion::Failed(diagnostic) => observer.on_failure(test, &diagnostic),
            Completion::Errored(diagnostic) => observer.on_error(test, &diagnostic),
        }
    }
}

/// Runs a suite with progress on a text stream and records every outcome to
/// the JSON report at `config.output` once the whole suite has finished.
pub struct JsonRunner<W: Write = Term> {
    config: RunnerConfig,
    out: W,
}

impl JsonRunner<Term> {
    pub fn new(config: RunnerConfig) -> Self {
        let out = config.stream.term();
        Self { config, out }
    }
}

impl<W: Write> JsonRunner<W> {
    pub fn with_writer(config: RunnerConfig, out: W) -> Self {
        Self { config, out }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs every test, prints the details and summary, then writes the
    /// report.
    ///
    /// The report is written once, after the last test. If writing it fails
    /// the returned error still carries the computed verdict.
    pub fn run(&mut self, suite: &[TestCase]) -> Result<RunResult, RunError> {
        info!(
            tests = suite.len(),
            output = %self.config.output.display(),
            verbosity = self.config.verbosity.as_ref(),
            stream = self.config.stream.as_ref(),
            "starting test run"
        );
        let started = Timestamp::now();

        let mut collector =
            JsonCollector::new(TextObserver::new(&mut self.out, self.config.verbosity));
        execute_suite(suite, &mut collector);
        let elapsed = Timestamp::now().duration_since(started);

        let (mut text, outcomes) = collector.into_parts();
        let summary = text.summary(elapsed);
        text.print_errors();
        text.print_summary(&summary);
        drop(text);

        info!(
            tests_run = summary.tests_run(),
            failures = summary.failures(),
            errors = summary.errors(),
            "test run finished"
        );

        let result = RunResult { summary, outcomes };
        match write_report(&self.config.output, &result.outcomes) {
            Ok(()) => Ok(result),
            Err(source) => {
                warn!(error = %source, "test report not written");
                Err(RunError::new(result, source))
            }
        }
    }
}
