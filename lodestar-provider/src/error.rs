//! Provider configuration error types

use thiserror::Error;

/// Errors that can occur while loading provider configuration or the AWS
/// client context
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// The configuration is not valid JSON for a provider configuration
    #[error("Failed to parse provider configuration: {0}")]
    Parse(String),

    /// The configured region is not a region name
    #[error("Invalid region '{0}', expected a region like us-east-1 or aws.Region.us_east_1")]
    InvalidRegion(String),

    /// No region was configured and none could be found in the environment
    #[error("No region configured")]
    MissingRegion,

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),
}

impl ConfigError {
    pub fn aws(err: impl std::fmt::Debug) -> Self {
        Self::Aws(format!("{:?}", err))
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
