//! Static lookup tables mapping MIME types and extensions to categories.

use std::collections::HashMap;

use super::types::{FormatEntry, MediaCategory, TargetFormat};

/// Read-only registry of known categories, MIME types and extensions.
///
/// Built once at startup and shared by reference; there is no way to mutate
/// a registry after construction.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    entries: Vec<FormatEntry>,
    by_mime: HashMap<String, MediaCategory>,
    by_extension: HashMap<String, MediaCategory>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormatRegistry {
    /// Registry with the built-in image, video and audio tables.
    pub fn builtin() -> Self {
        Self::from_entries(builtin_entries())
    }

    /// Builds a registry from explicit table rows.
    ///
    /// When a MIME type or extension appears in several rows the first row wins.
    pub fn from_entries(entries: Vec<FormatEntry>) -> Self {
        let mut by_mime = HashMap::new();
        let mut by_extension = HashMap::new();

        for entry in &entries {
            for mime in &entry.mime_types {
                by_mime
                    .entry(normalize_mime(mime))
                    .or_insert(entry.category);
            }
            for ext in &entry.extensions {
                by_extension
                    .entry(normalize_format(ext))
                    .or_insert(entry.category);
            }
        }

        Self {
            entries,
            by_mime,
            by_extension,
        }
    }

    /// Category of a declared MIME type, `Unknown` when unregistered.
    pub fn classify_by_mime(&self, mime: &str) -> MediaCategory {
        self.by_mime
            .get(&normalize_mime(mime))
            .copied()
            .unwrap_or(MediaCategory::Unknown)
    }

    /// Category of a format string such as `JPG`, `.jpg` or `jpg`.
    pub fn classify_by_extension(&self, format: &str) -> MediaCategory {
        self.by_extension
            .get(&normalize_format(format))
            .copied()
            .unwrap_or(MediaCategory::Unknown)
    }

    /// Whether the MIME type belongs to any registered category.
    pub fn is_allowed_mime(&self, mime: &str) -> bool {
        self.by_mime.contains_key(&normalize_mime(mime))
    }

    /// Resolves a user supplied format string, `None` when it is not registered.
    pub fn resolve_target(&self, format: &str) -> Option<TargetFormat> {
        let extension = normalize_format(format);
        self.by_extension
            .get(&extension)
            .copied()
            .map(|category| TargetFormat {
                extension,
                category,
            })
    }

    /// Table rows in registration order.
    pub fn entries(&self) -> &[FormatEntry] {
        &self.entries
    }
}

/// Lowercases and strips leading dots and surrounding whitespace.
pub fn normalize_format(format: &str) -> String {
    format.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Lowercases and drops parameters such as `; charset=...`.
fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn builtin_entries() -> Vec<FormatEntry> {
    vec![
        FormatEntry::new(
            MediaCategory::Image,
            &["image/jpeg", "image/png", "image/bmp"],
            &["jpg", "jpeg", "png", "bmp"],
        ),
        FormatEntry::new(
            MediaCategory::Video,
            &["video/mp4", "video/x-msvideo", "video/quicktime", "video/x-flv"],
            &["mp4", "avi", "mov", "flv"],
        ),
        FormatEntry::new(
            MediaCategory::Audio,
            &[
                "audio/mpeg",
                "audio/wav",
                "audio/3gpp",
                "audio/midi",
                "audio/x-midi",
            ],
            &["mp3", "wav", "3gp", "midi"],
        ),
    ]
}
