//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the runner.

use std::collections::HashMap;
use std::error::Error as _;
use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use reqres_application::ports::{HttpClient, HttpClientError};
use reqres_domain::{
    request::{HttpMethod, RequestSpec},
    response::ResponseSpec,
};

use crate::config::RunnerConfig;

const MAX_REDIRECTS: usize = 10;
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client implementation using reqwest.
///
/// Wraps a `reqwest::Client` configured once from a [`RunnerConfig`]:
/// timeout, user agent, redirect limit and the optional API key header
/// apply to every request.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a client from the runner configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// client cannot be created.
    pub fn new(config: &RunnerConfig) -> Result<Self, HttpClientError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| HttpClientError::Other(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    ///
    /// reqwest keeps the interesting part (DNS, refused) in the source chain,
    /// so the whole chain is inspected.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        let message = error_chain(error);
        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(message);
        }

        HttpClientError::Other(message)
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
        let method = request.method;
        let url = request.full_url();
        let body = request.body.clone();

        async move {
            let url = url.map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;

            let start = Instant::now();

            let mut builder = self.client.request(Self::to_reqwest_method(method), url);
            if let Some(body) = &body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(|e| self.map_error(&e))?;

            let status = response.status().as_u16();

            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| self.map_error(&e))?
                .to_vec();

            let duration = start.elapsed();
            tracing::debug!(status, elapsed_ms = duration.as_millis(), "response received");

            Ok(ResponseSpec::new(status, headers, body_bytes, duration))
        }
    }
}
