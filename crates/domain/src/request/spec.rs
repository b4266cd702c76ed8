//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{HttpMethod, QueryParam, QueryParams};
use crate::error::{DomainError, DomainResult};

/// Complete specification for one outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL without query string
    pub url: String,
    /// Query parameters appended to the URL
    #[serde(default)]
    pub query: QueryParams,
    /// JSON body, sent with `Content-Type: application/json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    /// Creates a request with the given method and URL and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Post, url).with_body(body)
    }

    /// Creates a PUT request with a JSON body.
    #[must_use]
    pub fn put(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Put, url).with_body(body)
    }

    /// Creates a PATCH request with a JSON body.
    #[must_use]
    pub fn patch(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Patch, url).with_body(body)
    }

    /// Creates a DELETE request with the given URL.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Builds the final URL including the query string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the URL is malformed.
    pub fn full_url(&self) -> DomainResult<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }

    /// Returns the URL as it would be sent, falling back to the raw URL when
    /// it does not parse.
    #[must_use]
    pub fn display_url(&self) -> String {
        self.full_url()
            .map_or_else(|_| self.url.clone(), |url| url.to_string())
    }
}
