//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::ExternalConverter;
use super::types::ConverterExit;

/// Upper bound on captured error output kept for diagnostics.
const MAX_ERROR_OUTPUT: usize = 4096;

/// Runs `ffmpeg -y -i <input> <output>` for each conversion.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds ffmpeg arguments: overwrite flag, input, extra args, output.
    fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];

        args.extend(self.config.extra_args.iter().cloned());

        args.push(output_path.to_string_lossy().to_string());

        args
    }

    fn spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::ConverterNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }
}

fn is_error_line(line: &str) -> bool {
    line.contains("Error") || line.contains("error")
}

#[async_trait]
impl ExternalConverter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<ConverterExit, ConverterError> {
        // stdout passes straight through, stderr goes to the log.
        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(self.build_args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Drain stderr to EOF; closing the pipe early would kill the child.
        let mut error_output = String::new();
        if let Some(stderr) = child.stderr.take() {
            let mut reader = BufReader::new(stderr);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        let line = line.trim_end();
                        debug!(target: "convertino::ffmpeg", "{}", line);
                        if is_error_line(line) && error_output.len() < MAX_ERROR_OUTPUT {
                            error_output.push_str(line);
                            error_output.push('\n');
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read converter output");
                        break;
                    }
                }
            }
        }

        let status = child.wait().await?;

        Ok(ConverterExit {
            code: status.code(),
            stderr: if error_output.is_empty() {
                None
            } else {
                Some(error_output)
            },
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                return Err(ConverterError::conversion_failed(
                    format!("ffmpeg -version exited with code: {:?}", output.status.code()),
                    None,
                ))
            }
            Err(e) => return Err(self.spawn_error(e)),
        }

        // Ensure temp dir exists
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        Ok(())
    }
}
