//! Types for the processor module.

use serde::Serialize;
use std::io;
use std::path::Path;
use tempfile::TempPath;

use crate::converter::ConvertedArtifact;
use crate::formats::TargetFormat;

/// Download name used for multi-file results.
pub const ARCHIVE_DOWNLOAD_NAME: &str = "converted_files.zip";

/// A file that was skipped because its conversion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Position of the file in the request.
    pub index: usize,
    /// Original filename.
    pub filename: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Result of running a batch through the converter.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Resolved target format.
    pub target: TargetFormat,
    /// Successful conversions, in request order.
    pub artifacts: Vec<ConvertedArtifact>,
    /// Files that were skipped, in request order.
    pub failures: Vec<FileFailure>,
}

/// The downloadable result of a request.
///
/// Dropping a `PackagedOutput` removes the underlying file.
#[derive(Debug)]
pub enum PackagedOutput {
    /// Exactly one file converted; returned as is.
    Single(ConvertedArtifact),
    /// Several files converted and bundled into a zip archive.
    Archive { path: TempPath, file_count: usize },
}

impl PackagedOutput {
    pub fn path(&self) -> &Path {
        match self {
            Self::Single(artifact) => artifact.path(),
            Self::Archive { path, .. } => path,
        }
    }

    /// Filename offered to the client.
    pub fn download_name(&self) -> &str {
        match self {
            Self::Single(artifact) => artifact.download_name(),
            Self::Archive { .. } => ARCHIVE_DOWNLOAD_NAME,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Single(_) => "application/octet-stream",
            Self::Archive { .. } => "application/zip",
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive { .. })
    }

    /// Number of converted files contained in the output.
    pub fn file_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Archive { file_count, .. } => *file_count,
        }
    }

    /// Deletes the output now, reporting any error.
    pub fn close(self) -> io::Result<()> {
        match self {
            Self::Single(artifact) => artifact.close(),
            Self::Archive { path, .. } => path.close(),
        }
    }
}
