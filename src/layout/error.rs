//! Error types for the layout pipeline

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during layout computation
///
/// All of these are fatal for the render: no diagram is produced.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The layout engine could not be started
    #[error("layout engine '{command}' is unavailable: {source}")]
    EngineUnavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The layout engine ran but reported failure
    #[error("layout engine '{command}' failed ({status}): {stderr}")]
    EngineFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The layout engine did not finish in time
    #[error("layout engine '{command}' timed out after {}ms", timeout.as_millis())]
    EngineTimeout { command: String, timeout: Duration },

    /// The layout engine's output could not be understood
    #[error("malformed layout engine output at line {line}: {reason}")]
    MalformedOutput { line: usize, reason: String },

    /// I/O failure while talking to the layout engine
    #[error("layout engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LayoutError {
    /// Create an engine failure error
    pub fn engine_failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::EngineFailed {
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a malformed output error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            line,
            reason: reason.into(),
        }
    }
}
