use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::runner::RunResult;

/// Failure to turn a root directory and pattern into a list of tests.
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("invalid test pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("test directory {} is not accessible", root.display())]
    Root {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk test directory {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Failure to persist or load the JSON report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode test results as JSON")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to decode test results from {}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write test results to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to load a runner configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A run that completed but whose report could not be persisted.
///
/// The verdict is still available through [`RunError::result`].
#[derive(Debug, Error)]
#[error("test run completed but the report was not written")]
pub struct RunError {
    result: RunResult,
    #[source]
    source: ReportError,
}

impl RunError {
    pub(crate) fn new(result: RunResult, source: ReportError) -> Self {
        Self { result, source }
    }

    pub fn result(&self) -> &RunResult {
        &self.result
    }

    pub fn report_error(&self) -> &ReportError {
        &self.source
    }

    pub fn into_result(self) -> RunResult {
        self.result
    }
}
