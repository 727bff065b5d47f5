use std::path::Path;

use anyhow::Result;

use crate::config::RunnerConfig;
use crate::discover::discover;
use crate::models::TestCase;

/// Discovers tests without running them. The pattern falls back to the one
/// in `<root>/jury.toml`, then to the default.
pub fn run(root: &Path, pattern: Option<String>) -> Result<Vec<TestCase>> {
    let pattern = match pattern {
        Some(pattern) => pattern,
        None => RunnerConfig::from_root(root)?.pattern,
    };
    Ok(discover(root, &pattern)?)
}
