//! Testing utilities and mock implementations.
//!
//! The mock converter stands in for ffmpeg so the whole pipeline can be
//! exercised without a real binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use convertino_core::testing::{fixtures, MockConverter};
//!
//! let converter = MockConverter::new();
//! converter.fail_for_name("broken", 1).await;
//!
//! let files = vec![fixtures::image("a.png"), fixtures::image("broken.png")];
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedRun};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::validator::UploadedFile;

    /// A small PNG upload.
    pub fn image(name: &str) -> UploadedFile {
        UploadedFile::new(name, "image/png", format!("png:{}", name).into_bytes())
    }

    /// A small MP4 upload.
    pub fn video(name: &str) -> UploadedFile {
        UploadedFile::new(name, "video/mp4", format!("mp4:{}", name).into_bytes())
    }

    /// A small MP3 upload.
    pub fn audio(name: &str) -> UploadedFile {
        UploadedFile::new(name, "audio/mpeg", format!("mp3:{}", name).into_bytes())
    }

    /// An upload of exactly `size` bytes.
    pub fn sized(name: &str, mime: &str, size: usize) -> UploadedFile {
        UploadedFile::new(name, mime, vec![0u8; size])
    }
}
