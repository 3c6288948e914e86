//! Types for the converter module.

use std::io;
use std::path::Path;
use tempfile::TempPath;

/// Name used when the upload has no usable filename.
pub const FALLBACK_BASE_NAME: &str = "file";

/// Suffix used for the temporary input when the upload has no extension.
pub const FALLBACK_EXTENSION: &str = ".tmp";

/// How an external converter process finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterExit {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Error lines captured from the process, if any.
    pub stderr: Option<String>,
}

impl ConverterExit {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            stderr: None,
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            stderr: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Names derived from the original upload filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    /// Filename without its final extension.
    pub base_name: String,
    /// Final extension including the dot, e.g. `.png`.
    pub input_extension: String,
}

impl FileNames {
    /// Derives base name and extension, falling back to placeholders.
    ///
    /// Directory components are stripped, and characters that cannot appear
    /// in a download filename are replaced with `_`.
    pub fn derive(filename: Option<&str>) -> Self {
        let name = filename
            .map(|n| n.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(n))
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let (base, ext) = match name {
            None => ("", ""),
            Some(n) => match n.rfind('.') {
                Some(idx) => (&n[..idx], &n[idx..]),
                None => (n, ""),
            },
        };

        let base_name = match sanitize(base) {
            b if b.is_empty() => FALLBACK_BASE_NAME.to_string(),
            b => b,
        };
        let input_extension = match sanitize(ext) {
            e if e.len() <= 1 => FALLBACK_EXTENSION.to_string(),
            e => e,
        };

        Self {
            base_name,
            input_extension,
        }
    }

    /// Download filename for the given target extension.
    pub fn output_name(&self, target_extension: &str) -> String {
        format!("{}.{}", self.base_name, target_extension)
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_control() || matches!(c, '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// A successfully converted output file.
///
/// The file lives at a temporary path that is deleted when the artifact is
/// dropped, so an artifact that is never packaged cannot leak onto disk.
#[derive(Debug)]
pub struct ConvertedArtifact {
    path: TempPath,
    download_name: String,
    source_name: String,
}

impl ConvertedArtifact {
    pub fn new(path: TempPath, download_name: String, source_name: String) -> Self {
        Self {
            path,
            download_name,
            source_name,
        }
    }

    /// Location of the converted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename the client should see, e.g. `holiday.mp3`.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Name of the upload this artifact was produced from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Deletes the file now, reporting any error.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}
