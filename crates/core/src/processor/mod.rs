//! Batch processing: orchestration of a whole request and output packaging.
//!
//! A request is validated once, every file is converted by a
//! [`ConversionWorker`](crate::converter::ConversionWorker), failed files are
//! skipped, and the survivors are returned either as a single file or as a
//! zip archive.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use convertino_core::converter::{ConverterConfig, FfmpegConverter};
//! use convertino_core::formats::FormatRegistry;
//! use convertino_core::processor::ConversionService;
//! use convertino_core::validator::{BatchLimits, ConversionRequest};
//!
//! let config = ConverterConfig::default();
//! let converter = Arc::new(FfmpegConverter::new(config.clone()));
//! let service = ConversionService::new(
//!     Arc::new(FormatRegistry::builtin()),
//!     BatchLimits::default(),
//!     converter,
//!     &config,
//! );
//!
//! let output = service.process(&ConversionRequest::new("mp3", files)).await?;
//! println!("Download {} from {}", output.download_name(), output.path().display());
//! ```

mod error;
mod orchestrator;
mod packager;
mod service;
mod types;

pub use error::ConversionError;
pub use orchestrator::BatchOrchestrator;
pub use packager::OutputPackager;
pub use service::ConversionService;
pub use types::{BatchOutcome, FileFailure, PackagedOutput, ARCHIVE_DOWNLOAD_NAME};
