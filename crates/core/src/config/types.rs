use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use crate::converter::ConverterConfig;
use crate::validator::BatchLimits;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub limits: BatchLimits,
}

impl Config {
    /// Largest request body the server should accept.
    ///
    /// Room for every allowed file at its maximum size, plus a fixed
    /// allowance for multipart framing and form fields.
    pub fn max_body_bytes(&self) -> usize {
        const MULTIPART_OVERHEAD: u64 = 1024 * 1024;
        let files = (self.limits.max_files as u64).saturating_mul(self.limits.max_file_size_bytes);
        usize::try_from(files.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX)
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

/// Sanitized config for API responses (local paths reduced to what clients need)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub converter: SanitizedConverterConfig,
    pub limits: BatchLimits,
}

/// Converter settings safe to expose.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConverterConfig {
    /// Executable name without its directory.
    pub binary: String,
    pub timeout_secs: u64,
    pub max_parallel_conversions: usize,
    pub extra_args_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let converter = &config.converter;
        Self {
            server: config.server.clone(),
            converter: SanitizedConverterConfig {
                binary: binary_name(&converter.ffmpeg_path),
                timeout_secs: converter.timeout_secs,
                max_parallel_conversions: converter.max_parallel_conversions,
                extra_args_configured: !converter.extra_args.is_empty(),
            },
            limits: config.limits.clone(),
        }
    }
}

fn binary_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
