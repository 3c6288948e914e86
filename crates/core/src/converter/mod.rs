//! Converter module for transcoding uploaded media files.
//!
//! This module provides the `ExternalConverter` trait, an FFmpeg
//! implementation of it, and the `ConversionWorker` that wraps a converter
//! with temporary file management.
//!
//! # Example
//!
//! ```ignore
//! use convertino_core::converter::{ConversionWorker, ConverterConfig, FfmpegConverter};
//!
//! let config = ConverterConfig::default();
//! let worker = ConversionWorker::new(Arc::new(FfmpegConverter::new(config.clone())), &config);
//!
//! let artifact = worker.convert(&upload, &target).await?;
//! println!("Converted into {}", artifact.download_name());
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;
mod worker;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::ExternalConverter;
pub use types::{
    ConvertedArtifact, ConverterExit, FileNames, FALLBACK_BASE_NAME, FALLBACK_EXTENSION,
};
pub use worker::ConversionWorker;
