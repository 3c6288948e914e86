//! Request types consumed by the validator and the processor.

use serde::{Deserialize, Serialize};

/// A single uploaded file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename supplied by the client, if any.
    pub filename: Option<String>,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        }
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Name used in log lines and error messages.
    pub fn display_name(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "<unnamed>",
        }
    }
}

/// A batch of files to convert into a single target format.
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    /// Target format as supplied by the user (e.g. `mp3`, `.PNG`).
    pub target_format: String,
    /// Files in submission order.
    pub files: Vec<UploadedFile>,
}

impl ConversionRequest {
    pub fn new(target_format: impl Into<String>, files: Vec<UploadedFile>) -> Self {
        Self {
            target_format: target_format.into(),
            files,
        }
    }
}

/// Batch-level and per-file size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLimits {
    /// Maximum number of files per request.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum size of a single file in bytes (inclusive).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

fn default_max_files() -> usize {
    5
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}
