//! HTTP Client Abstraction
//!
//! The SDK performs exactly two kinds of request: the profile lookup and the
//! avatar download. Both are single `GET` attempts.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use crate::error::Result;

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Ask for a JSON response body.
    pub fn accept_json(self) -> Self {
        self.header("Accept", "application/json")
    }
}

/// HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait
///
/// Implementations map the platform network stack onto a single call: send
/// the request once and return the bytes, or an error. Non-2xx statuses are
/// returned as responses, not errors; callers decide what counts as failure.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn fetch_profile(client: &dyn HttpClient, token: &str) -> Result<Bytes> {
///     let request = HttpRequest::get("https://app.chatwoot.com/api/v1/profile")
///         .accept_json()
///         .header("api_access_token", token);
///
///     let response = client.execute(request).await?;
///     Ok(response.body)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
