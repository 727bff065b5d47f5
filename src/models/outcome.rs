use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Terminal status of one executed test, as written to the report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Successful,
    Failed,
    Error,
}

/// One entry of the JSON report.
///
/// `exception` carries the diagnostic of a failed assertion and `error` the
/// diagnostic of an unexpected fault. A successful outcome has neither.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestOutcome {
    test: String,
    status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exception: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TestOutcome {
    pub fn successful(test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            status: TestStatus::Successful,
            exception: None,
            error: None,
        }
    }

    pub fn failed(test: impl Into<String>, exception: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            status: TestStatus::Failed,
            exception: Some(exception.into()),
            error: None,
        }
    }

    pub fn errored(test: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            status: TestStatus::Error,
            exception: None,
            error: Some(error.into()),
        }
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// The diagnostic text, whichever key it is stored under.
    pub fn detail(&self) -> Option<&str> {
        self.exception.as_deref().or(self.error.as_deref())
    }
}
