//! Mock converter for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConverterError, ConverterExit, ExternalConverter};

/// A recorded converter run for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    /// Temporary input path the converter was given.
    pub input: PathBuf,
    /// Temporary output path the converter was given.
    pub output: PathBuf,
    /// Content of the input at the time of the run.
    pub input_data: Vec<u8>,
    /// Whether the run reported success.
    pub success: bool,
}

/// Mock implementation of the `ExternalConverter` trait.
///
/// By default every run succeeds and copies the input bytes to the output.
/// Provides controllable behavior for testing:
/// - Track runs for assertions
/// - Fail every run, or only runs whose output name contains a pattern
/// - Inject launch errors
/// - Simulate slow conversions and observe concurrency
///
/// # Example
///
/// ```rust,ignore
/// use convertino_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_for_name("broken", 1).await;
///
/// // Runs whose output is named like `..._broken.mp3` exit with code 1.
/// let runs = converter.recorded_runs().await;
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded runs.
    runs: Arc<RwLock<Vec<RecordedRun>>>,
    /// If set, the next run will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// If set, every run exits with this code.
    fail_all_code: Arc<RwLock<Option<i32>>>,
    /// Output name fragments that make a run exit with the paired code.
    failing_names: Arc<RwLock<Vec<(String, i32)>>>,
    /// Simulated run duration.
    run_duration: Arc<RwLock<Duration>>,
    /// Runs currently in progress.
    active: Arc<AtomicUsize>,
    /// Highest number of simultaneous runs observed.
    max_active: Arc<AtomicUsize>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            runs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fail_all_code: Arc::new(RwLock::new(None)),
            failing_names: Arc::new(RwLock::new(Vec::new())),
            run_duration: Arc::new(RwLock::new(Duration::ZERO)),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded runs.
    pub async fn recorded_runs(&self) -> Vec<RecordedRun> {
        self.runs.read().await.clone()
    }

    /// Get the number of runs performed.
    pub async fn run_count(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Make every subsequent run exit with `code`.
    pub async fn fail_all(&self, code: i32) {
        *self.fail_all_code.write().await = Some(code);
    }

    /// Make runs whose output filename contains `fragment` exit with `code`.
    pub async fn fail_for_name(&self, fragment: impl Into<String>, code: i32) {
        self.failing_names.write().await.push((fragment.into(), code));
    }

    /// Configure the next run to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated run duration.
    pub async fn set_run_duration(&self, duration: Duration) {
        *self.run_duration.write().await = duration;
    }

    /// Highest number of runs observed in progress at the same time.
    pub fn max_concurrent_runs(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    async fn exit_code_for(&self, output: &Path) -> i32 {
        if let Some(code) = *self.fail_all_code.read().await {
            return code;
        }

        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.failing_names
            .read()
            .await
            .iter()
            .find(|(fragment, _)| name.contains(fragment.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0)
    }

    async fn simulate(&self, input: &Path, output: &Path) -> Result<ConverterExit, ConverterError> {
        let input_data = tokio::fs::read(input).await?;
        let code = self.exit_code_for(output).await;

        let duration = *self.run_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        if code == 0 {
            tokio::fs::write(output, &input_data).await?;
        }

        self.runs.write().await.push(RecordedRun {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_data,
            success: code == 0,
        });

        if code == 0 {
            return Ok(ConverterExit::success());
        }
        Ok(ConverterExit {
            stderr: Some(format!("mock error: exit code {}\n", code)),
            ..ConverterExit::failure(code)
        })
    }
}

#[async_trait]
impl ExternalConverter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<ConverterExit, ConverterError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        let result = self.simulate(input, output).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
