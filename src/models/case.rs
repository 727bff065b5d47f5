use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

type InProcessFn = Box<dyn Fn() -> anyhow::Result<()>>;

enum TestBody {
    InProcess(InProcessFn),
    Executable { path: PathBuf, workdir: PathBuf },
}

/// A single runnable test.
///
/// In-process tests are closures: returning `Ok(())` passes, panicking (which
/// is what the assertion macros do) fails, and returning an error is treated
/// as an unexpected fault. Executable tests are spawned as child processes and
/// judged by their exit status.
pub struct TestCase {
    name: String,
    body: TestBody,
}

/// How a test reached its terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Passed,
    Failed(String),
    Errored(String),
}

impl TestCase {
    pub fn in_process<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            body: TestBody::InProcess(Box::new(body)),
        }
    }

    /// An executable test, run with `workdir` as its working directory.
    pub fn executable(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            body: TestBody::Executable {
                path: path.into(),
                workdir: workdir.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executable_path(&self) -> Option<&Path> {
        match &self.body {
            TestBody::InProcess(_) => None,
            TestBody::Executable { path, .. } => Some(path),
        }
    }

    /// Runs the test to completion on the calling thread.
    pub fn execute(&self) -> Completion {
        debug!(test = %self.name, "executing test");
        match &self.body {
            TestBody::InProcess(body) => run_in_process(body),
            TestBody::Executable { path, workdir } => run_executable(path, workdir),
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TestCase");
        s.field("name", &self.name);
        match &self.body {
            TestBody::InProcess(_) => s.field("body", &"<in-process>"),
            TestBody::Executable { path, workdir } => {
                s.field("path", path).field("workdir", workdir)
            }
        };
        s.finish()
    }
}

const NO_ERROR_MESSAGE: &str = "test returned an error with no message";
const NO_PANIC_MESSAGE: &str = "test panicked with no message";

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<Completion>> = const { RefCell::new(None) };
}

/// Installs a process-wide panic hook that records panics raised by a running
/// in-process test instead of printing them. Panics on other threads, or
/// outside a test, go to the previously installed hook.
fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let completion = describe_panic(info);
                LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(completion));
            } else {
                previous(info);
            }
        }));
    });
}

fn run_in_process(body: &InProcessFn) -> Completion {
    install_panic_hook();

    LAST_PANIC.with(|slot| slot.borrow_mut().take());
    CAPTURING.with(|flag| flag.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| body()));
    CAPTURING.with(|flag| flag.set(false));

    match result {
        Ok(Ok(())) => Completion::Passed,
        Ok(Err(err)) => {
            let diagnostic = format!("{err:?}");
            if diagnostic.trim().is_empty() {
                Completion::Errored(NO_ERROR_MESSAGE.to_owned())
            } else {
                Completion::Errored(diagnostic)
            }
        }
        Err(payload) => LAST_PANIC
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| {
                let message = panic_message(&*payload);
                classify_panic(&message, message.clone())
            }),
    }
}

/// True for panics raised by the `assert!` family: `assertion failed: ...`
/// from `assert!`, ``assertion `left == right` failed`` from `assert_eq!`
/// and `assert_ne!`. A custom `assert!(cond, "...")` message carries no such
/// prefix and counts as a fault.
fn is_assertion(message: &str) -> bool {
    message.starts_with("assertion failed") || message.starts_with("assertion `left")
}

/// Assertion panics fail the test; every other panic (arithmetic faults,
/// `unwrap` on `None`, out-of-bounds indexing, explicit `panic!`) errors it.
fn classify_panic(message: &str, diagnostic: String) -> Completion {
    if is_assertion(message) {
        Completion::Failed(diagnostic)
    } else {
        Completion::Errored(diagnostic)
    }
}

fn describe_panic(info: &PanicHookInfo<'_>) -> Completion {
    let message = panic_message(info.payload());
    let mut diagnostic = match info.location() {
        Some(location) => format!("panicked at {location}:\n{message}"),
        None => format!("panicked:\n{message}"),
    };

    // Honors RUST_BACKTRACE / RUST_LIB_BACKTRACE.
    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        diagnostic.push_str("\nstack backtrace:\n");
        diagnostic.push_str(&backtrace.to_string());
    }
    classify_panic(&message, diagnostic)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_owned()
    };
    if message.trim().is_empty() {
        NO_PANIC_MESSAGE.to_owned()
    } else {
        message
    }
}

fn run_executable(path: &Path, workdir: &Path) -> Completion {
    let output = duct::cmd(path, std::iter::empty::<&str>())
        .dir(workdir)
        .stdin_null()
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run();

    let output = match output {
        Ok(output) => output,
        Err(err) => {
            return Completion::Errored(format!("failed to spawn {}: {err}", path.display()));
        }
    };

    let captured = render_captured(&output.stdout, &output.stderr);
    match output.status.code() {
        Some(0) => Completion::Passed,
        Some(code) => Completion::Failed(format!("exited with status {code}{captured}")),
        None => Completion::Errored(format!("terminated by {}{captured}", output.status)),
    }
}

fn render_captured(stdout: &[u8], stderr: &[u8]) -> String {
    let mut rendered = String::new();
    for (label, bytes) in [("stdout", stdout), ("stderr", stderr)] {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_end();
        if !text.is_empty() {
            rendered.push_str(&format!("\n--- {label} ---\n{text}"));
        }
    }
    rendered
}
