//! Per-file conversion with scoped temporary files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempPath;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::formats::TargetFormat;
use crate::metrics::{CONVERSIONS_TOTAL, CONVERSION_DURATION};
use crate::validator::UploadedFile;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::ExternalConverter;
use super::types::{ConvertedArtifact, ConverterExit, FileNames};

const INPUT_PREFIX: &str = "convertino_input_";
const OUTPUT_PREFIX: &str = "convertino_output_";

/// Converts one uploaded file into one output file.
///
/// The temporary input is removed before `convert` returns on every path.
/// The temporary output is removed on failure, or handed to the caller
/// inside the returned [`ConvertedArtifact`] on success.
pub struct ConversionWorker<C: ExternalConverter + ?Sized> {
    converter: Arc<C>,
    temp_dir: PathBuf,
    timeout: Duration,
}

impl<C: ExternalConverter + ?Sized> ConversionWorker<C> {
    pub fn new(converter: Arc<C>, config: &ConverterConfig) -> Self {
        Self {
            converter,
            temp_dir: config.temp_dir.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Converts `file` into `target`.
    pub async fn convert(
        &self,
        file: &UploadedFile,
        target: &TargetFormat,
    ) -> Result<ConvertedArtifact, ConverterError> {
        let start = Instant::now();
        let names = FileNames::derive(file.filename.as_deref());

        let result = self.convert_named(file, target, &names).await;

        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.metric_label(),
        };
        CONVERSIONS_TOTAL.with_label_values(&[label]).inc();
        CONVERSION_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn convert_named(
        &self,
        file: &UploadedFile,
        target: &TargetFormat,
        names: &FileNames,
    ) -> Result<ConvertedArtifact, ConverterError> {
        let input = self.materialize(file, names).await?;

        let result = self.run_converter(&input, file, target, names).await;

        if let Err(e) = input.close() {
            warn!(
                file = %file.display_name(),
                error = %e,
                "Failed to delete temporary input file"
            );
        }

        result
    }

    /// Writes the upload into a fresh temporary file.
    async fn materialize(
        &self,
        file: &UploadedFile,
        names: &FileNames,
    ) -> Result<TempPath, ConverterError> {
        tokio::fs::create_dir_all(&self.temp_dir)
            .await
            .map_err(ConverterError::TempFile)?;

        let path = tempfile::Builder::new()
            .prefix(INPUT_PREFIX)
            .suffix(&names.input_extension)
            .tempfile_in(&self.temp_dir)
            .map_err(ConverterError::TempFile)?
            .into_temp_path();

        // On error the TempPath is dropped here, which removes the file.
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(ConverterError::TempFile)?;

        Ok(path)
    }

    async fn run_converter(
        &self,
        input: &Path,
        file: &UploadedFile,
        target: &TargetFormat,
        names: &FileNames,
    ) -> Result<ConvertedArtifact, ConverterError> {
        let download_name = names.output_name(&target.extension);

        let output = tempfile::Builder::new()
            .prefix(OUTPUT_PREFIX)
            .suffix(&format!("_{}", download_name))
            .tempfile_in(&self.temp_dir)
            .map_err(ConverterError::TempFile)?
            .into_temp_path();

        debug!(
            file = %file.display_name(),
            input = %input.display(),
            output = %output.display(),
            converter = self.converter.name(),
            "Running converter"
        );

        // Dropping the run future on timeout also drops the child process.
        let outcome = match timeout(self.timeout, self.converter.run(input, &output)).await {
            Ok(result) => result,
            Err(_) => Err(ConverterError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(exit) if exit.is_success() => Ok(ConvertedArtifact::new(
                output,
                download_name,
                file.display_name().to_string(),
            )),
            Ok(exit) => {
                discard_output(output, file);
                Err(self.exit_error(exit))
            }
            Err(e) => {
                discard_output(output, file);
                Err(e)
            }
        }
    }

    fn exit_error(&self, exit: ConverterExit) -> ConverterError {
        let reason = match exit.code {
            Some(code) => format!("{} exited with code: {}", self.converter.name(), code),
            None => format!("{} was terminated by a signal", self.converter.name()),
        };
        ConverterError::conversion_failed(reason, exit.stderr)
    }
}

fn discard_output(output: TempPath, file: &UploadedFile) {
    if let Err(e) = output.close() {
        warn!(
            file = %file.display_name(),
            error = %e,
            "Failed to delete temporary output file"
        );
    }
}
