//! Append-only sinks for per-request diagnostics.

use std::sync::Mutex;
use thiserror::Error;

/// Target used by `TracingSink`.
pub const DIAGNOSTICS_TARGET: &str = "timeout_floor::diagnostics";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("diagnostics sink unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget text sink. Nothing is read back.
pub trait DiagnosticsSink: Send + Sync {
    fn write(&self, line: &str) -> Result<(), SinkError>;
}

/// Writes each line as a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn write(&self, line: &str) -> Result<(), SinkError> {
        tracing::info!(target: DIAGNOSTICS_TARGET, "{}", line);
        Ok(())
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl DiagnosticsSink for MemorySink {
    fn write(&self, line: &str) -> Result<(), SinkError> {
        self.lines
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".to_string()))?
            .push(line.to_string());
        Ok(())
    }
}
