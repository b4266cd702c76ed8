//! Runner configuration.

use std::time::Duration;

use reqres_application::{RunMode, ScenarioCatalog};
use reqres_application::naming::DEFAULT_RANDOM_LENGTH;
use reqres_domain::DomainResult;

/// Base URL of the public demo service.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a run needs to know before it starts.
///
/// Defaults target the public demo service; the CLI overrides individual
/// fields from its flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Base URL all scenario paths are appended to.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Sent as `x-api-key` when set.
    pub api_key: Option<String>,
    /// Length of the random suffix in generated user names.
    pub name_length: usize,
    /// What to do after a failed scenario.
    pub mode: RunMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            api_key: None,
            name_length: DEFAULT_RANDOM_LENGTH,
            mode: RunMode::FailFast,
        }
    }
}

impl RunnerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the API key. Blank keys are ignored.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Sets the run mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builds the scenario catalog for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a valid http(s) URL.
    pub fn catalog(&self) -> DomainResult<ScenarioCatalog> {
        Ok(ScenarioCatalog::new(self.base_url.as_str())?.with_name_length(self.name_length))
    }
}

fn default_user_agent() -> String {
    format!("reqres-check/{}", env!("CARGO_PKG_VERSION"))
}
