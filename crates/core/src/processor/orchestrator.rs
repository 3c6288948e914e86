//! Batch orchestration: validate once, convert every file, keep the successes.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::converter::{ConversionWorker, ConverterConfig, ExternalConverter};
use crate::formats::FormatRegistry;
use crate::metrics::{BATCHES_TOTAL, BATCH_FILES};
use crate::validator::{BatchLimits, ConversionRequest, InputValidator};

use super::error::ConversionError;
use super::types::{BatchOutcome, FileFailure};

/// Runs a conversion worker over every file of a validated batch.
///
/// Individual failures are logged and skipped. The batch only fails when
/// no file at all could be converted.
pub struct BatchOrchestrator<C: ExternalConverter + ?Sized> {
    validator: InputValidator,
    worker: ConversionWorker<C>,
    max_parallel: usize,
}

impl<C: ExternalConverter + ?Sized> BatchOrchestrator<C> {
    pub fn new(
        registry: Arc<FormatRegistry>,
        limits: BatchLimits,
        converter: Arc<C>,
        config: &ConverterConfig,
    ) -> Self {
        Self {
            validator: InputValidator::new(registry, limits),
            worker: ConversionWorker::new(converter, config),
            max_parallel: config.max_parallel_conversions.max(1),
        }
    }

    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }

    pub fn worker(&self) -> &ConversionWorker<C> {
        &self.worker
    }

    /// Validates and converts the batch.
    ///
    /// Up to `max_parallel_conversions` files are converted at once; the
    /// returned artifacts are always in request order.
    pub async fn run(&self, request: &ConversionRequest) -> Result<BatchOutcome, ConversionError> {
        let target = match self
            .validator
            .validate(&request.target_format, &request.files)
        {
            Ok(target) => target,
            Err(e) => {
                BATCHES_TOTAL.with_label_values(&["rejected"]).inc();
                info!(
                    reason = e.code(),
                    error = %e,
                    "Rejected conversion request"
                );
                return Err(e.into());
            }
        };

        let total = request.files.len();
        BATCH_FILES.with_label_values(&[]).observe(total as f64);
        info!(
            files = total,
            format = %target.extension,
            parallel = self.max_parallel,
            "Starting batch conversion"
        );

        let worker = &self.worker;
        let target_ref = &target;
        let conversions: Vec<_> = request
            .files
            .iter()
            .enumerate()
            .map(move |(index, file)| async move {
                (index, file, worker.convert(file, target_ref).await)
            })
            .collect();
        let results: Vec<_> = stream::iter(conversions)
            .buffered(self.max_parallel)
            .collect()
            .await;

        let mut artifacts = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, file, result) in results {
            match result {
                Ok(artifact) => {
                    debug!(
                        file = %artifact.source_name(),
                        output = %artifact.download_name(),
                        index,
                        "File converted"
                    );
                    artifacts.push(artifact);
                }
                Err(e) => {
                    warn!(
                        file = %file.display_name(),
                        index,
                        error = %e,
                        "File conversion failed, skipping"
                    );
                    failures.push(FileFailure {
                        index,
                        filename: file.display_name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if artifacts.is_empty() {
            BATCHES_TOTAL.with_label_values(&["failed"]).inc();
            warn!(files = total, "No file in the batch could be converted");
            return Err(ConversionError::NoSuccessfulConversions { attempted: total });
        }

        let label = if failures.is_empty() {
            "completed"
        } else {
            "partial"
        };
        BATCHES_TOTAL.with_label_values(&[label]).inc();
        info!(
            converted = artifacts.len(),
            skipped = failures.len(),
            "Batch conversion finished"
        );

        Ok(BatchOutcome {
            target,
            artifacts,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockConverter};
    use crate::validator::ValidationError;
    use std::time::Duration;
    use tempfile::TempDir;

    fn orchestrator(
        temp: &TempDir,
        converter: MockConverter,
        max_parallel: usize,
    ) -> BatchOrchestrator<MockConverter> {
        let config = ConverterConfig::default()
            .with_temp_dir(temp.path().to_path_buf())
            .with_max_parallel(max_parallel);
        BatchOrchestrator::new(
            Arc::new(FormatRegistry::builtin()),
            BatchLimits::default(),
            Arc::new(converter),
            &config,
        )
    }

    #[tokio::test]
    async fn test_validation_failure_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let orchestrator = orchestrator(&temp, MockConverter::new(), 1);
        let request = ConversionRequest::new("mp4", vec![fixtures::image("a.png")]);

        let result = orchestrator.run(&request).await;

        assert!(matches!(
            result,
            Err(ConversionError::Validation(
                ValidationError::IncompatibleConversion { .. }
            ))
        ));
        assert_eq!(orchestrator.worker().converter().run_count().await, 0);
        assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successes_in_order() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        converter.fail_for_name("_b.", 1).await;
        let orchestrator = orchestrator(&temp, converter, 1);
        let request = ConversionRequest::new(
            "jpg",
            vec![
                fixtures::image("a.png"),
                fixtures::image("b.png"),
                fixtures::image("c.png"),
            ],
        );

        let outcome = orchestrator.run(&request).await.unwrap();

        let names: Vec<_> = outcome
            .artifacts
            .iter()
            .map(|a| a.download_name().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        let sources: Vec<_> = outcome.artifacts.iter().map(|a| a.source_name()).collect();
        assert_eq!(sources, vec!["a.png", "c.png"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert_eq!(outcome.failures[0].filename, "b.png");
        assert_eq!(orchestrator.worker().converter().run_count().await, 3);
    }

    #[tokio::test]
    async fn test_all_failed_is_batch_failure() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        converter.fail_all(1).await;
        let orchestrator = orchestrator(&temp, converter, 1);
        let request = ConversionRequest::new(
            "wav",
            vec![fixtures::audio("a.mp3"), fixtures::video("b.mp4")],
        );

        let result = orchestrator.run(&request).await;

        assert!(matches!(
            result,
            Err(ConversionError::NoSuccessfulConversions { attempted: 2 })
        ));
        assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_parallel_runs_are_bounded_and_ordered() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        converter.set_run_duration(Duration::from_millis(50)).await;
        let orchestrator = orchestrator(&temp, converter, 2);
        let files: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| fixtures::video(&format!("{}.mp4", n)))
            .collect();
        let request = ConversionRequest::new("mp3", files);

        let outcome = orchestrator.run(&request).await.unwrap();

        let names: Vec<_> = outcome
            .artifacts
            .iter()
            .map(|a| a.download_name().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3", "d.mp3", "e.mp3"]);
        let max = orchestrator.worker().converter().max_concurrent_runs();
        assert!(max >= 1 && max <= 2, "observed {} concurrent runs", max);
    }

    #[tokio::test]
    async fn test_sequential_by_default() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        converter.set_run_duration(Duration::from_millis(10)).await;
        let orchestrator = orchestrator(&temp, converter, 1);
        let request = ConversionRequest::new(
            "png",
            vec![fixtures::image("a.png"), fixtures::image("b.png")],
        );

        orchestrator.run(&request).await.unwrap();

        assert_eq!(orchestrator.worker().converter().max_concurrent_runs(), 1);
    }
}
