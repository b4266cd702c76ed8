//! Diagnostics sink port

/// Receives the rendered request/response block of every executed scenario.
pub trait DiagnosticsSink: Send + Sync {
    /// Records one rendered exchange.
    fn record(&self, block: &str);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn record(&self, _block: &str) {}
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for std::sync::Arc<T> {
    fn record(&self, block: &str) {
        (**self).record(block);
    }
}
