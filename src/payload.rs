//! Small utilities shipped with the runner: a greeting helper and a base64
//! file encoder, plus a demo suite exercising them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::models::TestCase;

/// Returns a greeting addressed to `name`.
pub fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}

/// Reads a file and returns its content as standard base64.
pub fn encode_file_to_base64(path: &Path) -> Result<String> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(STANDARD.encode(content))
}

#[derive(Debug, Clone, Serialize)]
pub struct EncodedFile {
    pub path: PathBuf,
    pub encoded: String,
}

pub fn encode_files(paths: &[PathBuf]) -> Result<Vec<EncodedFile>> {
    paths
        .iter()
        .map(|path| {
            Ok(EncodedFile {
                path: path.clone(),
                encoded: encode_file_to_base64(path)?,
            })
        })
        .collect()
}

/// The built-in suite run by `jury demo`.
pub fn demo_suite() -> Vec<TestCase> {
    vec![
        TestCase::in_process("payload::greet_world", || {
            assert_eq!(greet("World"), "Hello, World!");
            assert_eq!(greet("User"), "Hello, User!");
            Ok(())
        }),
        TestCase::in_process("payload::greet_lowercase", || {
            assert_eq!(greet("world"), "Hello, world!");
            Ok(())
        }),
        TestCase::in_process("payload::encode_file_to_base64", || {
            let mut file = tempfile::NamedTempFile::new().context("creating fixture file")?;
            file.write_all(b"Hello, world!")
                .context("writing fixture file")?;

            let encoded = encode_file_to_base64(file.path())?;
            assert_eq!(
                encoded, "SGVsbG8sIHdvcmxkIQ==",
                "The Base64 encoding is incorrect"
            );
            Ok(())
        }),
        TestCase::in_process("payload::encode_missing_file", || {
            let dir = tempfile::TempDir::new().context("creating fixture dir")?;
            let missing = dir.path().join("absent.txt");
            ensure!(
                encode_file_to_base64(&missing).is_err(),
                "encoding a missing file should fail"
            );
            Ok(())
        }),
    ]
}
