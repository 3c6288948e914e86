//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;
use super::types::ConverterExit;

/// An external program that converts one file into another.
///
/// Implementations only run the program; temporary file management, timeouts
/// and result interpretation belong to [`ConversionWorker`](super::ConversionWorker).
/// The output format is implied solely by the extension of `output`.
#[async_trait]
pub trait ExternalConverter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts `input` into `output`, returning how the process finished.
    ///
    /// Returns an error only when the process could not be launched or
    /// awaited. A process that ran and failed is reported through
    /// [`ConverterExit`].
    async fn run(&self, input: &Path, output: &Path) -> Result<ConverterExit, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ExitCodeConverter(i32);

    #[async_trait]
    impl ExternalConverter for ExitCodeConverter {
        fn name(&self) -> &str {
            "exit-code"
        }

        async fn run(&self, _input: &Path, _output: &Path) -> Result<ConverterExit, ConverterError> {
            Ok(ConverterExit {
                code: Some(self.0),
                stderr: None,
            })
        }
    }

    #[tokio::test]
    async fn test_trait_object_usage() {
        let converters: Vec<Box<dyn ExternalConverter>> =
            vec![Box::new(ExitCodeConverter(0)), Box::new(ExitCodeConverter(1))];

        let mut results = Vec::new();
        for converter in &converters {
            let exit = converter
                .run(Path::new("/in.wav"), Path::new("/out.mp3"))
                .await
                .unwrap();
            results.push(exit.is_success());
        }

        assert_eq!(results, vec![true, false]);
        assert!(converters[0].validate().await.is_ok());
    }
}
