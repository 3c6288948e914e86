//! Batch and per-file validation rules.

use std::sync::Arc;
use tracing::debug;

use crate::formats::{FormatRegistry, MediaCategory, TargetFormat};

use super::error::ValidationError;
use super::types::{BatchLimits, UploadedFile};

/// Checks a batch against the registry and the configured limits.
///
/// Checks run in a fixed order and the first violation wins:
/// batch emptiness, batch size, target format, then every file in
/// submission order (emptiness, size, MIME type, category compatibility).
#[derive(Debug, Clone)]
pub struct InputValidator {
    registry: Arc<FormatRegistry>,
    limits: BatchLimits,
}

impl InputValidator {
    pub fn new(registry: Arc<FormatRegistry>, limits: BatchLimits) -> Self {
        Self { registry, limits }
    }

    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    /// Validates the whole batch, returning the resolved target format.
    pub fn validate(
        &self,
        target_format: &str,
        files: &[UploadedFile],
    ) -> Result<TargetFormat, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }
        if files.len() > self.limits.max_files {
            return Err(ValidationError::BatchTooLarge {
                count: files.len(),
                max: self.limits.max_files,
            });
        }

        let target = self.registry.resolve_target(target_format).ok_or_else(|| {
            ValidationError::UnsupportedTargetFormat {
                format: target_format.to_string(),
            }
        })?;

        for file in files {
            self.validate_file(file, target.category)?;
        }

        debug!(
            files = files.len(),
            format = %target.extension,
            category = %target.category,
            "Batch passed validation"
        );

        Ok(target)
    }

    fn validate_file(
        &self,
        file: &UploadedFile,
        target_category: MediaCategory,
    ) -> Result<(), ValidationError> {
        let filename = file.display_name().to_string();

        if file.data.is_empty() {
            return Err(ValidationError::EmptyFile { filename });
        }

        let size = file.size();
        if size > self.limits.max_file_size_bytes {
            return Err(ValidationError::FileTooLarge {
                filename,
                size,
                max: self.limits.max_file_size_bytes,
            });
        }

        let mime = match file.content_type.as_deref() {
            Some(mime) if self.registry.is_allowed_mime(mime) => mime,
            _ => {
                return Err(ValidationError::UnsupportedMimeType {
                    filename,
                    mime: file.content_type.clone(),
                })
            }
        };

        let input_category = self.registry.classify_by_mime(mime);
        if !input_category.can_convert_to(target_category) {
            return Err(ValidationError::IncompatibleConversion {
                filename,
                from: input_category,
                to: target_category,
            });
        }

        Ok(())
    }
}
