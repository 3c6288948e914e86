//! End-to-end conversion service: validate, convert, package.

use std::sync::Arc;
use tracing::info;

use crate::converter::{ConverterConfig, ExternalConverter};
use crate::formats::FormatRegistry;
use crate::validator::{BatchLimits, ConversionRequest};

use super::error::ConversionError;
use super::orchestrator::BatchOrchestrator;
use super::packager::OutputPackager;
use super::types::PackagedOutput;

/// Handles a conversion request from upload to downloadable output.
pub struct ConversionService<C: ExternalConverter + ?Sized> {
    registry: Arc<FormatRegistry>,
    orchestrator: BatchOrchestrator<C>,
    packager: OutputPackager,
}

impl<C: ExternalConverter + ?Sized> ConversionService<C> {
    pub fn new(
        registry: Arc<FormatRegistry>,
        limits: BatchLimits,
        converter: Arc<C>,
        config: &ConverterConfig,
    ) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(Arc::clone(&registry), limits, converter, config),
            packager: OutputPackager::new(config.temp_dir.clone()),
            registry,
        }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &BatchLimits {
        self.orchestrator.validator().limits()
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator<C> {
        &self.orchestrator
    }

    /// Runs the whole pipeline for one request.
    pub async fn process(
        &self,
        request: &ConversionRequest,
    ) -> Result<PackagedOutput, ConversionError> {
        let outcome = self.orchestrator.run(request).await?;
        let skipped = outcome.failures.len();
        let output = self.packager.package(outcome.artifacts).await?;

        info!(
            format = %outcome.target.extension,
            files = output.file_count(),
            skipped,
            download = %output.download_name(),
            "Conversion request completed"
        );
        Ok(output)
    }
}
