//! Diagnostics sinks writing rendered exchanges to a stream.

use std::io::{self, Write};
use std::sync::Mutex;

use reqres_application::ports::DiagnosticsSink;

/// Writes each exchange block, followed by a newline, to `W`.
///
/// Write errors are logged and otherwise ignored; diagnostics never abort a
/// run.
#[derive(Debug)]
pub struct WriterDiagnostics<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterDiagnostics<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> DiagnosticsSink for WriterDiagnostics<W> {
    fn record(&self, block: &str) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(error) = writeln!(writer, "{block}").and_then(|()| writer.flush()) {
            tracing::warn!(%error, "failed to write diagnostics");
        }
    }
}

/// Diagnostics on standard output.
pub type StdoutDiagnostics = WriterDiagnostics<io::Stdout>;

impl StdoutDiagnostics {
    /// Creates a sink on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}
