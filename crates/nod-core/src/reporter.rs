//! Reporter trait for dependency injection
//!
//! Pipeline steps report progress through this trait instead of printing
//! directly, so the binary decides how output looks and tests can capture it.

use std::io::{Stdout, Write};
use std::sync::{Mutex, PoisonError};

/// Sink for user-facing progress output.
pub trait Reporter: Send + Sync {
    /// Log a pipeline step or derived value.
    fn info(&self, msg: &str);

    /// Log something unexpected that does not stop the run.
    fn warning(&self, msg: &str);

    /// Show the previous and new contents of a file about to be rewritten.
    fn diff(&self, old: &str, new: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn diff(&self, old: &str, new: &str) {
        (**self).diff(old, new);
    }
}

/// Prints `> message` lines and diff blocks, to stdout unless another
/// writer is given, and mirrors messages to `tracing`.
#[derive(Debug)]
pub struct ConsoleReporter<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleReporter {
    /// Report on standard output.
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Report into `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, lines: &[&str]) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // Progress output is best effort; a closed stdout must not abort a deploy.
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn info(&self, msg: &str) {
        tracing::debug!(target: "nod::report", "{msg}");
        self.emit(&[format!("> {msg}").as_str()]);
    }

    fn warning(&self, msg: &str) {
        tracing::debug!(target: "nod::report", "warn: {msg}");
        self.emit(&[format!("> warn: {msg}").as_str()]);
    }

    fn diff(&self, old: &str, new: &str) {
        self.emit(&["<<<<<<", old, "======", new, ">>>>>>"]);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn diff(&self, _: &str, _: &str) {}
}
