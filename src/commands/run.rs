use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::RunArgs;
use crate::config::{DEFAULT_REPORT_PATH, RunnerConfig, Stream, Verbosity};
use crate::discover::discover;
use crate::models::TestCase;
use crate::report::staging_path;
use crate::runner::{JsonRunner, RunResult};

/// Builds the run configuration: the config file (explicit, or `jury.toml`
/// in `root`), then command-line overrides on top.
pub fn resolve_config(
    root: &Path,
    config_path: Option<&Path>,
    pattern: Option<String>,
    args: &RunArgs,
) -> Result<RunnerConfig> {
    let mut config = match config_path {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::from_root(root)?,
    };

    if let Some(pattern) = pattern {
        config.pattern = pattern;
    }
    apply_overrides(&mut config, args);
    Ok(config)
}

pub fn apply_overrides(config: &mut RunnerConfig, args: &RunArgs) {
    if let Some(output) = &args.output {
        config.output.clone_from(output);
    }
    if args.verbose {
        config.verbosity = Verbosity::Verbose;
    } else if args.quiet {
        config.verbosity = Verbosity::Quiet;
    }
    if args.stdout {
        config.stream = Stream::Stdout;
    }
}

/// Report files that may sit inside a test root: the configured report, the
/// default one, and the staging file of each.
fn report_files(config: &RunnerConfig) -> Vec<PathBuf> {
    [config.output.as_path(), Path::new(DEFAULT_REPORT_PATH)]
        .into_iter()
        .flat_map(|path| [path.to_path_buf(), staging_path(path)])
        .filter_map(|path| fs::canonicalize(path).ok())
        .collect()
}

/// Discovers the tests under `root` and runs them.
///
/// Reports from earlier runs can match the pattern (`test*` matches
/// `test-results.json`), so they are never treated as tests.
pub fn run(root: &Path, config: RunnerConfig) -> Result<RunResult> {
    let mut suite = discover(root, &config.pattern)?;
    let reports = report_files(&config);
    suite.retain(|test| {
        test.executable_path()
            .is_none_or(|path| !reports.iter().any(|report| report == path))
    });
    if suite.is_empty() {
        warn!(root = %root.display(), pattern = %config.pattern, "no tests matched");
    }
    execute(&suite, config)
}

pub fn execute(suite: &[TestCase], config: RunnerConfig) -> Result<RunResult> {
    let output = config.output.clone();
    JsonRunner::new(config)
        .run(suite)
        .with_context(|| format!("Report {} was not updated", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn args() -> RunArgs {
        RunArgs {
            output: None,
            verbose: false,
            quiet: false,
            stdout: false,
            json: false,
        }
    }

    #[rstest]
    fn no_file_no_flags_is_default(args: RunArgs) {
        let dir = TempDir::new().unwrap();
        let config = resolve_config(dir.path(), None, None, &args).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    // Flags win over the config file; keys the flags leave alone keep the
    // file's values.
    #[rstest]
    fn flags_override_config_file(mut args: RunArgs) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "pattern = \"spec_*\"\nverbosity = \"quiet\"\noutput = \"from-file.json\"",
        )
        .unwrap();

        args.verbose = true;
        args.output = Some(PathBuf::from("from-flag.json"));
        let config = resolve_config(dir.path(), None, None, &args).unwrap();

        assert_eq!(config.pattern, "spec_*");
        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert_eq!(config.output, PathBuf::from("from-flag.json"));
    }

    #[rstest]
    fn explicit_config_path_is_used(args: RunArgs) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "stream = \"stdout\"").unwrap();

        let config = resolve_config(dir.path(), Some(path.as_path()), Some("t_*".into()), &args).unwrap();
        assert_eq!(config.stream, Stream::Stdout);
        assert_eq!(config.pattern, "t_*");
    }

    #[rstest]
    fn missing_explicit_config_is_an_error(args: RunArgs) {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(resolve_config(dir.path(), Some(missing.as_path()), None, &args).is_err());
    }

    #[rstest]
    fn run_with_no_matches_writes_empty_report() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("results.json");
        let config = RunnerConfig {
            output: output.clone(),
            verbosity: Verbosity::Quiet,
            ..RunnerConfig::default()
        };

        let result = run(dir.path(), config).unwrap();
        assert!(result.was_successful());
        assert_eq!(std::fs::read_to_string(output).unwrap(), "[]");
    }

    // The report from a previous run sits in the root and matches `test*`.
    #[rstest]
    fn previous_report_is_not_discovered() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("test-results.json");
        let config = RunnerConfig {
            output: output.clone(),
            verbosity: Verbosity::Quiet,
            ..RunnerConfig::default()
        };

        run(dir.path(), config.clone()).unwrap();
        let result = run(dir.path(), config).unwrap();
        assert!(result.outcomes().is_empty());
        assert_eq!(std::fs::read_to_string(output).unwrap(), "[]");
    }

    // A staging file left behind by an interrupted write matches the
    // pattern as well and must not be run.
    #[rstest]
    fn leftover_staging_file_is_not_discovered() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("test-results.json");
        std::fs::write(dir.path().join("test-results.json.tmp"), "[").unwrap();
        let config = RunnerConfig {
            output,
            verbosity: Verbosity::Quiet,
            ..RunnerConfig::default()
        };

        let result = run(dir.path(), config).unwrap();
        assert!(result.outcomes().is_empty());
    }

    #[rstest]
    fn run_with_bad_pattern_fails_before_running() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("results.json");
        let config = RunnerConfig {
            output: output.clone(),
            pattern: "test[".into(),
            ..RunnerConfig::default()
        };

        assert!(run(dir.path(), config).is_err());
        assert!(!output.exists());
    }
}
