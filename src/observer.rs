use std::fmt::Display;
use std::io::Write;

use console::{Term, style};
use jiff::SignedDuration;

use crate::config::Verbosity;
use crate::models::TestCase;
use crate::runner::RunSummary;

const SEPARATOR_HEAVY: &str =
    "======================================================================";
const SEPARATOR_LIGHT: &str =
    "----------------------------------------------------------------------";

/// Receives the terminal event of every executed test.
///
/// The runner calls exactly one of `on_success`, `on_failure` or `on_error`
/// per test, after `start_test`, on the thread that executed the test.
pub trait Observer {
    fn start_test(&mut self, _test: &TestCase) {}

    fn on_success(&mut self, test: &TestCase);

    /// An assertion in the test did not hold.
    fn on_failure(&mut self, test: &TestCase, diagnostic: &str);

    /// The test hit a fault that was not an assertion.
    fn on_error(&mut self, test: &TestCase, diagnostic: &str);
}

/// The default bookkeeping observer: keeps the run counters, the failure and
/// error details, and prints progress to a stream.
pub struct TextObserver<W: Write = Term> {
    out: W,
    verbosity: Verbosity,
    tests_run: usize,
    failures: Vec<(String, String)>,
    errors: Vec<(String, String)>,
    dots: bool,
}

impl<W: Write> TextObserver<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self {
            out,
            verbosity,
            tests_run: 0,
            failures: Vec::new(),
            errors: Vec::new(),
            dots: false,
        }
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    pub fn errors(&self) -> &[(String, String)] {
        &self.errors
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    pub fn summary(&self, elapsed: SignedDuration) -> RunSummary {
        RunSummary::new(self.tests_run, self.failures.len(), self.errors.len(), elapsed)
    }

    // Progress output never fails the run.
    fn emit(&mut self, text: impl Display) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn progress(&mut self, verbose: impl Display, short: impl Display) {
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => {
                self.dots = true;
                self.emit(short);
            }
            Verbosity::Verbose => self.emit(format_args!("{verbose}\n")),
        }
    }

    /// Prints the collected failure and error details.
    pub fn print_errors(&mut self) {
        if self.dots {
            self.emit("\n");
            self.dots = false;
        }
        let errors = std::mem::take(&mut self.errors);
        let failures = std::mem::take(&mut self.failures);
        self.print_error_list("ERROR", &errors);
        self.print_error_list("FAIL", &failures);
        self.errors = errors;
        self.failures = failures;
    }

    fn print_error_list(&mut self, flavour: &str, entries: &[(String, String)]) {
        for (test, diagnostic) in entries {
            self.emit(format_args!(
                "{SEPARATOR_HEAVY}\n{}: {test}\n{SEPARATOR_LIGHT}\n{}\n\n",
                style(flavour).red().bold(),
                textwrap::indent(diagnostic, "  ").trim_end()
            ));
        }
    }

    /// Prints the closing `Ran N tests` block and the overall verdict.
    pub fn print_summary(&mut self, summary: &RunSummary) {
        let plural = if summary.tests_run() == 1 { "" } else { "s" };
        self.emit(format_args!(
            "{SEPARATOR_LIGHT}\nRan {} test{plural} in {:.3}s\n\n",
            summary.tests_run(),
            summary.elapsed().as_secs_f64()
        ));

        if summary.was_successful() {
            self.emit(format_args!("{}\n", style("OK").green().bold()));
            return;
        }

        let mut counts = Vec::new();
        if summary.failures() > 0 {
            counts.push(format!("failures={}", summary.failures()));
        }
        if summary.errors() > 0 {
            counts.push(format!("errors={}", summary.errors()));
        }
        self.emit(format_args!(
            "{} ({})\n",
            style("FAILED").red().bold(),
            counts.join(", ")
        ));
    }
}

impl<W: Write> Observer for TextObserver<W> {
    fn start_test(&mut self, test: &TestCase) {
        self.tests_run += 1;
        if self.verbosity == Verbosity::Verbose {
            self.emit(format_args!("{test} ... "));
        }
    }

    fn on_success(&mut self, _test: &TestCase) {
        self.progress(style("ok").green(), ".");
    }

    fn on_failure(&mut self, test: &TestCase, diagnostic: &str) {
        self.failures.push((test.name().to_owned(), diagnostic.to_owned()));
        self.progress(style("FAIL").red(), style("F").red());
    }

    fn on_error(&mut self, test: &TestCase, diagnostic: &str) {
        self.errors.push((test.name().to_owned(), diagnostic.to_owned()));
        self.progress(style("ERROR").red().bold(), style("E").red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use rstest::rstest;

    fn case(name: &str) -> TestCase {
        TestCase::in_process(name, || Ok(()))
    }

    fn drive(observer: &mut TextObserver<Vec<u8>>) {
        let (a, b, c) = (case("a"), case("b"), case("c"));
        observer.start_test(&a);
        observer.on_success(&a);
        observer.start_test(&b);
        observer.on_failure(&b, "assertion failed\nleft: 1");
        observer.start_test(&c);
        observer.on_error(&c, "division by zero");
    }

    fn text(observer: TextObserver<Vec<u8>>) -> String {
        strip_ansi_codes(&String::from_utf8(observer.out).unwrap()).into_owned()
    }

    #[rstest]
    fn counts_every_terminal_event() {
        let mut observer = TextObserver::new(Vec::new(), Verbosity::Quiet);
        drive(&mut observer);
        assert_eq!(observer.tests_run(), 3);
        assert_eq!(observer.failures().len(), 1);
        assert_eq!(observer.errors().len(), 1);
        assert_eq!(observer.failures()[0].0, "b");
        assert_eq!(observer.errors()[0].1, "division by zero");
        assert!(!observer.was_successful());
    }

    #[rstest]
    #[case::quiet(Verbosity::Quiet, "")]
    #[case::normal(Verbosity::Normal, ".FE")]
    #[case::verbose(Verbosity::Verbose, "a ... ok\nb ... FAIL\nc ... ERROR\n")]
    fn progress_follows_verbosity(#[case] verbosity: Verbosity, #[case] expected: &str) {
        let mut observer = TextObserver::new(Vec::new(), verbosity);
        drive(&mut observer);
        assert_eq!(text(observer), expected);
    }

    // Details are printed errors first, then failures, each under its own
    // header with the diagnostic indented.
    #[rstest]
    fn print_errors_lists_details() {
        let mut observer = TextObserver::new(Vec::new(), Verbosity::Normal);
        drive(&mut observer);
        observer.print_errors();
        let output = text(observer);

        let error_at = output.find("ERROR: c").unwrap();
        let fail_at = output.find("FAIL: b").unwrap();
        assert!(output.starts_with(".FE\n"));
        assert!(error_at < fail_at);
        assert!(output.contains("  assertion failed\n  left: 1"));
        assert!(output.contains("  division by zero"));
    }

    // Printing the details must not consume them.
    #[rstest]
    fn print_errors_keeps_bookkeeping() {
        let mut observer = TextObserver::new(Vec::new(), Verbosity::Quiet);
        drive(&mut observer);
        observer.print_errors();
        assert_eq!(observer.failures().len(), 1);
        assert_eq!(observer.errors().len(), 1);
    }

    #[rstest]
    #[case::all_ok(RunSummary::new(2, 0, 0, SignedDuration::ZERO), "Ran 2 tests in 0.000s", "OK")]
    #[case::single(RunSummary::new(1, 0, 0, SignedDuration::ZERO), "Ran 1 test in", "OK")]
    #[case::mixed(
        RunSummary::new(3, 1, 1, SignedDuration::from_millis(1500)),
        "Ran 3 tests in 1.500s",
        "FAILED (failures=1, errors=1)"
    )]
    #[case::errors_only(
        RunSummary::new(2, 0, 2, SignedDuration::ZERO),
        "Ran 2 tests",
        "FAILED (errors=2)"
    )]
    fn summary_reports_verdict(
        #[case] summary: RunSummary,
        #[case] ran: &str,
        #[case] verdict: &str,
    ) {
        let mut observer = TextObserver::new(Vec::new(), Verbosity::Quiet);
        observer.print_summary(&summary);
        let output = text(observer);
        assert!(output.contains(ran), "{output}");
        assert!(output.trim_end().ends_with(verdict), "{output}");
    }
}
