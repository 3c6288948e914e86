//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting a single file.
///
/// All of these are per-file failures: the batch keeps going and the file is
/// simply left out of the output.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Converter binary not found.
    #[error("Converter binary not found at path: {path}")]
    ConverterNotFound { path: PathBuf },

    /// Converter process exited unsuccessfully.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Temporary file could not be created or written.
    #[error("Failed to prepare temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    /// I/O error while running the converter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Label used for the conversion result metric.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::ConverterNotFound { .. } => "not_found",
            Self::ConversionFailed { .. } => "failed",
            Self::Timeout { .. } => "timeout",
            Self::TempFile(_) | Self::Io(_) => "io_error",
        }
    }
}
