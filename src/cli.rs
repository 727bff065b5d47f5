use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jury")]
#[command(about = "Run tests and record their outcomes to a JSON report", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that runs tests.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Where to write the JSON report [default: ./test-results.json]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print each test name and its result
    #[arg(long, short, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print only the summary
    #[arg(long, short)]
    pub quiet: bool,

    /// Write progress and summary to stdout instead of stderr
    #[arg(long)]
    pub stdout: bool,

    /// Also print the recorded outcomes as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover test executables under a directory and run them
    Run {
        /// Directory to search for tests
        #[arg(default_value = ".")]
        root: PathBuf,

        /// File-name glob selecting test files [default: test*]
        #[arg(long, short)]
        pattern: Option<String>,

        /// Config file to read instead of <ROOT>/jury.toml
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        args: RunArgs,
    },

    /// List the tests that `run` would execute
    List {
        /// Directory to search for tests
        #[arg(default_value = ".")]
        root: PathBuf,

        /// File-name glob selecting test files [default: test*]
        #[arg(long, short)]
        pattern: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the built-in demo suite
    Demo {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Print a greeting
    Greet {
        /// Who to greet
        #[arg(default_value = "World")]
        name: String,
    },

    /// Print the base64 encoding of files
    Encode {
        /// Files to encode
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
