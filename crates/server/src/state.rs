use std::sync::Arc;
use convertino_core::{
    Config, ConversionService, ExternalConverter, FormatRegistry, SanitizedConfig,
};

/// Service type shared by every request handler.
pub type SharedService = ConversionService<dyn ExternalConverter>;

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<SharedService>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<SharedService>) -> Self {
        Self { config, service }
    }

    /// Builds the conversion service from configuration and a converter.
    pub fn from_converter(config: Config, converter: Arc<dyn ExternalConverter>) -> Self {
        let service = ConversionService::new(
            Arc::new(FormatRegistry::builtin()),
            config.limits.clone(),
            converter,
            &config.converter,
        );
        Self::new(config, Arc::new(service))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn service(&self) -> &SharedService {
        self.service.as_ref()
    }
}
