//! Test discovery: turning a directory tree and a file-name pattern into an
//! ordered list of executable test cases.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::errors::DiscoverError;
use crate::models::TestCase;

/// Compiles a file-name glob such as `test*`.
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher, DiscoverError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|source| DiscoverError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })
}

/// Finds every regular file under `root` whose file name matches `pattern`.
///
/// The walk is depth-first with siblings sorted by file name, so the result
/// is stable across runs. Hidden files and directories are skipped. Each test
/// is named by its path relative to `root` and runs with `root` as its
/// working directory.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<TestCase>, DiscoverError> {
    let matcher = compile_pattern(pattern)?;
    let root = fs::canonicalize(root).map_err(|source| DiscoverError::Root {
        root: root.to_path_buf(),
        source,
    })?;

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut cases = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| DiscoverError::Walk {
            root: root.clone(),
            source,
        })?;

        if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
            continue;
        }

        let name = test_name(&root, entry.path());
        trace!(test = %name, "discovered test");
        cases.push(TestCase::executable(name, entry.path(), &root));
    }

    debug!(root = %root.display(), pattern, count = cases.len(), "discovery finished");
    Ok(cases)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn test_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
