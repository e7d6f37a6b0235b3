//! Thin HTTP client for upstream services.
//!
//! Each tool invocation maps to exactly one outbound request. The client reads
//! the full response body as text regardless of HTTP status; interpreting a
//! non-success status is the caller's job, so only transport-level failures
//! (connect, send, body read) are errors at this layer.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type for upstream requests.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Transport-level failure while talking to an upstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not be sent or the response body could not be read.
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Raw upstream response: status code plus the full body as text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared HTTP client with sensible defaults.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Create a new client with the gateway's user agent and timeouts.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Issue a GET with the given query pairs.
    pub async fn get(&self, url: &str, query: &[(String, String)]) -> UpstreamResult<RawResponse> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        Self::read(response).await
    }

    /// Issue a POST with a JSON body and the given extra headers.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> UpstreamResult<RawResponse> {
        debug!("POST {}", url);
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> UpstreamResult<RawResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}
