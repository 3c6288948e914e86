//! Error types for batch processing.

use thiserror::Error;

use crate::validator::ValidationError;

/// Errors that fail a whole conversion request.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The request was rejected before any conversion started.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every file in an otherwise valid batch failed to convert.
    #[error("None of the {attempted} submitted file(s) could be converted")]
    NoSuccessfulConversions { attempted: usize },

    /// Building the archive failed.
    #[error("Failed to build archive: {0}")]
    Packaging(#[from] zip::result::ZipError),

    /// I/O error while packaging or reading the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    /// Whether the client caused this error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
