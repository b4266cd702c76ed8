//! Application error types

use reqres_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors.
///
/// Assertion failures are not errors: they are reported as scenario
/// outcomes. Anything here aborts the run.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
