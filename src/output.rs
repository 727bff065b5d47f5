use std::path::Path;

use anyhow::Result;
use console::{Term, style};
use serde::Serialize;

use crate::models::TestCase;
use crate::payload::EncodedFile;
use crate::runner::RunResult;

/// Command output on stdout, either styled text or JSON.
pub struct Output {
    term: Term,
    json: bool,
}

#[derive(Serialize)]
struct ListedTest<'a> {
    test: &'a str,
    path: Option<&'a Path>,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    pub fn test_list(&self, tests: &[TestCase], root: &Path) -> Result<()> {
        if self.json {
            let listed: Vec<ListedTest<'_>> = tests
                .iter()
                .map(|test| ListedTest {
                    test: test.name(),
                    path: test.executable_path(),
                })
                .collect();
            return self.print_json(&listed);
        }

        if tests.is_empty() {
            self.term.write_line(&format!(
                "No tests found in {}.",
                style(root.display()).cyan()
            ))?;
            return Ok(());
        }

        for test in tests {
            self.term.write_line(&test.to_string())?;
        }
        self.term.write_line("")?;
        self.term.write_line(&format!(
            "{} test(s) found in {}",
            style(tests.len()).green().bold(),
            style(root.display()).cyan()
        ))?;
        Ok(())
    }

    pub fn report_written(&self, result: &RunResult, path: &Path) -> Result<()> {
        if self.json {
            return self.print_json(result.outcomes());
        }

        self.term.write_line(&format!(
            "{} {} ({} entries)",
            style("Wrote report:").green(),
            style(path.display()).cyan().bold(),
            result.outcomes().len()
        ))?;
        Ok(())
    }

    pub fn greeting(&self, text: &str) -> Result<()> {
        self.term.write_line(text)?;
        Ok(())
    }

    pub fn encoded_files(&self, files: &[EncodedFile]) -> Result<()> {
        if self.json {
            return self.print_json(files);
        }

        for file in files {
            self.term.write_line(&format!(
                "{} {}",
                style("Encoded").bold(),
                style(file.path.display()).cyan()
            ))?;
            self.term.write_line(&file.encoded)?;
        }
        Ok(())
    }
}
