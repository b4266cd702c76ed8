//! CLI-specific error types and exit code mapping

use reqres_application::{ApplicationError, HttpClientError};
use reqres_domain::DomainError;

/// Errors that abort the command.
///
/// Failed scenarios are not errors; they end up in the report and only
/// change the exit code.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be turned into a runner.
    #[error("configuration error: {0}")]
    Config(String),

    /// The run stopped on a transport error.
    #[error("run aborted: {0}")]
    Run(#[from] ApplicationError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<HttpClientError> for CliError {
    fn from(e: HttpClientError) -> Self {
        Self::Config(e.to_string())
    }
}

/// At least one scenario failed.
pub const EXIT_FAILED: u8 = 1;

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                 |
    /// |------|-----------------------------------------|
    /// | 0    | No scenario failed                      |
    /// | 1    | A scenario failed (not an error)        |
    /// | 2    | Transport, configuration or output error |
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Run(_) | Self::JsonSerialize(_) | Self::Io(_) => 2,
        }
    }
}
