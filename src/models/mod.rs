mod case;
mod outcome;

pub use case::{Completion, TestCase};
pub use outcome::{TestOutcome, TestStatus};
