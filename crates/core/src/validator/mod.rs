//! Input validation for conversion requests.
//!
//! Validation is all-or-nothing: a single violation rejects the whole batch
//! before any temporary file is created or any converter process runs.

mod error;
mod rules;
mod types;

pub use error::ValidationError;
pub use rules::InputValidator;
pub use types::{BatchLimits, ConversionRequest, UploadedFile};
