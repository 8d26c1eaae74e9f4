//! Error reporting sinks.
//!
//! The core never owns a logger; it writes its error report through an
//! injected line sink and forgets about it. The default sink forwards to
//! `tracing`, tests capture the lines instead.

use tracing::error;

/// Receives the formatted error report, one line per call.
pub trait ReportSink {
    /// Emits a single report line.
    fn emit(&mut self, line: &str);
}

/// Forwards report lines to the `tracing` error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, line: &str) {
        error!("{line}");
    }
}

/// Collects report lines in memory; used by tests and diagnostics tooling.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    lines: Vec<String>,
}

impl CaptureSink {
    /// The captured lines in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drops all captured lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl ReportSink for CaptureSink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}
