//! Shared request primitive for the HTTP-based lookup methods

use dyndns_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;
use std::time::Duration;

/// Default HTTP timeout for lookup requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// GETs a URL and returns the body as text
///
/// Every request carries the configured `User-Agent`, if any. A 418 answer
/// is not an error: some echo services use it as a soft block, and the body
/// is handed back for the caller to make sense of. Every other non-2xx
/// status is an [`Error::Http`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher with an optional `User-Agent`
    pub fn new(user_agent: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            user_agent,
        }
    }

    /// GET `url` and return the response body
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(ref user_agent) = self.user_agent {
            request = request.header(USER_AGENT, user_agent.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::IM_A_TEAPOT {
            tracing::debug!("{} answered 418, not treating it as an error", url);
        } else if !status.is_success() {
            return Err(Error::http(format!("GET {} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", url, e)))
    }
}
