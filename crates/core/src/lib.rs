pub mod config;
pub mod converter;
pub mod formats;
pub mod metrics;
pub mod processor;
pub mod testing;
pub mod validator;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use converter::{
    ConversionWorker, ConvertedArtifact, ConverterConfig, ConverterError, ExternalConverter,
    FfmpegConverter,
};
pub use formats::{FormatRegistry, MediaCategory, TargetFormat};
pub use processor::{ConversionError, ConversionService, PackagedOutput};
pub use validator::{BatchLimits, ConversionRequest, UploadedFile, ValidationError};
