// # DuckDNS Provider
//
// This crate provides the DuckDNS provider for the dynamic DNS updater.
//
// ## Behavior
//
// - One GET per engine call, no retries (the next cycle is the retry)
// - The `ip=` parameter is always sent empty: DuckDNS takes the address
//   from the connecting socket, so the provider is called even when no
//   lookup method produced an address
// - Non-2xx statuses are errors and abort the cycle
//
// ## Security Requirements
//
// - The token is part of the URL, so neither the URL nor reqwest errors
//   carrying it are ever logged
//
// ## API Reference
//
// - https://www.duckdns.org/spec.jsp
// - `GET /update?domains={domains}&token={token}&ip=` answers `OK` or `KO`

use async_trait::async_trait;
use dyndns_core::config::DuckDnsConfig;
use dyndns_core::traits::DnsProvider;
use dyndns_core::{Error, Result};
use std::time::Duration;

/// DuckDNS base URL
const DUCKDNS_API_BASE: &str = "https://www.duckdns.org";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// DuckDNS provider (Provider A)
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the token.
pub struct DuckDnsProvider {
    /// Comma separated subdomains
    domains: String,

    /// Account token
    /// ⚠️ NEVER log this value
    token: String,

    /// API base URL, overridable for tests
    base_url: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for DuckDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDnsProvider")
            .field("domains", &self.domains)
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DuckDnsProvider {
    /// Create a new DuckDNS provider
    ///
    /// Fails if either the domain list or the token is empty.
    pub fn new(domains: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let config = DuckDnsConfig::from_parts(domains, token)
            .ok_or_else(|| Error::config("DuckDNS domains and token are both required"))?;
        Ok(Self::from_config(&config))
    }

    /// Create a provider from an enabled configuration
    pub fn from_config(config: &DuckDnsConfig) -> Self {
        Self {
            domains: config.domains.clone(),
            token: config.token.clone(),
            base_url: DUCKDNS_API_BASE.to_string(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Send updates somewhere other than www.duckdns.org
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn update_url(&self) -> String {
        format!(
            "{}/update?domains={}&token={}&ip=",
            self.base_url, self.domains, self.token
        )
    }
}

#[async_trait]
impl DnsProvider for DuckDnsProvider {
    /// Ask DuckDNS to point the domains at the caller's address
    ///
    /// `ip` is ignored; DuckDNS infers the address itself.
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /update?domains=home,work&token=<token>&ip=
    /// ```
    async fn update(&self, _ip: &str) -> Result<String> {
        tracing::info!("Updating DuckDNS domains {} (address inferred)", self.domains);

        let response = self
            .client
            .get(self.update_url())
            .send()
            .await
            .map_err(|e| {
                Error::provider("duckdns", format!("HTTP request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return match status.as_u16() {
                401 | 403 => Err(Error::provider(
                    "duckdns",
                    format!("Authentication failed: check DUCK_TOKEN. Status: {}", status),
                )),
                429 => Err(Error::provider(
                    "duckdns",
                    format!("Rate limit exceeded. Status: {}", status),
                )),
                500..=599 => Err(Error::provider(
                    "duckdns",
                    format!("DuckDNS server error (transient): {} - {}", status, body.trim()),
                )),
                _ => Err(Error::provider(
                    "duckdns",
                    format!("Update failed: {} - {}", status, body.trim()),
                )),
            };
        }

        if body.trim() == "KO" {
            tracing::warn!("DuckDNS rejected the update for {}: KO", self.domains);
        }

        Ok(body)
    }

    fn infers_address(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "duckdns"
    }
}
