//! Error types for input validation.

use thiserror::Error;

use crate::formats::MediaCategory;

/// Client-caused errors detected before any conversion work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No files were submitted.
    #[error("No files were submitted")]
    EmptyBatch,

    /// More files than allowed in one request.
    #[error("Too many files: {count} submitted, at most {max} allowed per request")]
    BatchTooLarge { count: usize, max: usize },

    /// Target format is not registered.
    #[error("Target format '{format}' is not supported")]
    UnsupportedTargetFormat { format: String },

    /// A file has no content.
    #[error("File '{filename}' is empty")]
    EmptyFile { filename: String },

    /// A file exceeds the size limit.
    #[error("File '{filename}' is too large ({size} bytes, limit {max} bytes)")]
    FileTooLarge {
        filename: String,
        size: u64,
        max: u64,
    },

    /// Declared MIME type is missing or not registered.
    #[error("File '{filename}' has unsupported type '{}'", .mime.as_deref().unwrap_or("none"))]
    UnsupportedMimeType {
        filename: String,
        mime: Option<String>,
    },

    /// The input category cannot be converted into the target category.
    #[error("Conversion from {from} to {to} is not allowed (file '{filename}')")]
    IncompatibleConversion {
        filename: String,
        from: MediaCategory,
        to: MediaCategory,
    },
}

impl ValidationError {
    /// Short machine-readable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "empty_batch",
            Self::BatchTooLarge { .. } => "batch_too_large",
            Self::UnsupportedTargetFormat { .. } => "unsupported_target_format",
            Self::EmptyFile { .. } => "empty_file",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::UnsupportedMimeType { .. } => "unsupported_mime_type",
            Self::IncompatibleConversion { .. } => "incompatible_conversion",
        }
    }
}
