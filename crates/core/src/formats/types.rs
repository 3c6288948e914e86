//! Types for the format registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad media category used to decide which conversions are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Image,
    Video,
    Audio,
    /// Anything not present in the registry.
    Unknown,
}

impl MediaCategory {
    /// Whether a file of this category may be converted into `target`.
    ///
    /// Same-category conversions are allowed for every known category,
    /// and video may additionally be reduced to its audio track.
    pub fn can_convert_to(self, target: MediaCategory) -> bool {
        matches!(
            (self, target),
            (Self::Image, Self::Image)
                | (Self::Audio, Self::Audio)
                | (Self::Video, Self::Video)
                | (Self::Video, Self::Audio)
        )
    }

    /// Categories a file of this category may be converted into.
    pub fn allowed_targets(self) -> Vec<MediaCategory> {
        [Self::Image, Self::Video, Self::Audio]
            .into_iter()
            .filter(|target| self.can_convert_to(*target))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the registry table: a category with its MIME types and extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatEntry {
    pub category: MediaCategory,
    pub mime_types: Vec<String>,
    pub extensions: Vec<String>,
}

impl FormatEntry {
    pub fn new(category: MediaCategory, mime_types: &[&str], extensions: &[&str]) -> Self {
        Self {
            category,
            mime_types: mime_types.iter().map(|m| m.to_string()).collect(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// A validated target format: normalized extension plus its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFormat {
    /// Lowercase extension without a leading dot, e.g. `mp3`.
    pub extension: String,
    pub category: MediaCategory,
}
