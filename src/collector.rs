use tracing::trace;

use crate::models::{TestCase, TestOutcome};
use crate::observer::Observer;

/// Records a [`TestOutcome`] for every terminal event, in completion order.
///
/// Each event is first handed to the wrapped observer so its bookkeeping
/// (counters, progress output) runs exactly as it would without the
/// collector.
pub struct JsonCollector<O> {
    inner: O,
    outcomes: Vec<TestOutcome>,
}

impl<O: Observer> JsonCollector<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            outcomes: Vec::new(),
        }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn into_parts(self) -> (O, Vec<TestOutcome>) {
        (self.inner, self.outcomes)
    }

    fn record(&mut self, outcome: TestOutcome) {
        trace!(test = outcome.test(), status = outcome.status().as_ref(), "recorded outcome");
        self.outcomes.push(outcome);
    }
}

impl<O: Observer> Observer for JsonCollector<O> {
    fn start_test(&mut self, test: &TestCase) {
        self.inner.start_test(test);
    }

    fn on_success(&mut self, test: &TestCase) {
        self.inner.on_success(test);
        self.record(TestOutcome::successful(test.name()));
    }

    fn on_failure(&mut self, test: &TestCase, diagnostic: &str) {
        self.inner.on_failure(test, diagnostic);
        self.record(TestOutcome::failed(test.name(), diagnostic));
    }

    fn on_error(&mut self, test: &TestCase, diagnostic: &str) {
        self.inner.on_error(test, diagnostic);
        self.record(TestOutcome::errored(test.name(), diagnostic));
    }
}
