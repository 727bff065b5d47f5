use std::fs;
use std::path::{Path, PathBuf};

use console::Term;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::debug;

use crate::errors::ConfigError;

pub const DEFAULT_REPORT_PATH: &str = "./test-results.json";
pub const DEFAULT_PATTERN: &str = "test*";
pub const CONFIG_FILE: &str = "jury.toml";

/// How much progress output the text observer prints while tests run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Where human-readable output goes. The JSON report is always a file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stream {
    #[default]
    Stderr,
    Stdout,
}

impl Stream {
    pub fn term(self) -> Term {
        match self {
            Self::Stderr => Term::stderr(),
            Self::Stdout => Term::stdout(),
        }
    }
}

/// Settings for one run. Every field has a default, so an empty config file
/// (or none at all) writes the report to `./test-results.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub output: PathBuf,
    pub pattern: String,
    pub verbosity: Verbosity,
    pub stream: Stream,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_REPORT_PATH),
            pattern: DEFAULT_PATTERN.to_owned(),
            verbosity: Verbosity::default(),
            stream: Stream::default(),
        }
    }
}

impl RunnerConfig {
    /// Reads a TOML config file. Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Loads `jury.toml` from `root` if present, otherwise the defaults.
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
