use std::io;

use thiserror::Error;

/// Library-wide error type for ptcase operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Required environment variable is not set.
    #[error("Environment variable '{0}' is missing")]
    EnvironmentVariableMissing(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Intake field is invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Backend call failed at the transport or protocol level for one attempt.
    #[error("Backend request failed: {message}")]
    BackendError { message: String, status: Option<u16> },

    /// Backend responded without any usable generated text.
    #[error("Backend returned no usable text: {0}")]
    EmptyCompletion(String),

    /// Retry budget exhausted for one prompt.
    #[error("Generation failed after {attempts} attempt(s): {cause}")]
    GenerationFailed {
        attempts: u32,
        #[source]
        cause: Box<AppError>,
    },

    /// A case study section could not be generated; the run is aborted.
    #[error("Section '{section}' could not be generated: {cause}")]
    SectionFailed {
        section: String,
        #[source]
        cause: Box<AppError>,
    },
}
