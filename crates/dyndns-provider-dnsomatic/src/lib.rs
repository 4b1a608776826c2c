// # DNS-O-Matic Provider
//
// This crate provides the DNS-O-Matic provider for the dynamic DNS updater.
//
// DNS-O-Matic fans one update out to every service configured in the
// account, addressed through the special hostname `all.dnsomatic.com`.
// Unlike DuckDNS it does not infer the address: an empty `myip` would be
// taken literally, so the engine only calls this provider with a real one.
//
// ## API Reference
//
// - https://www.dnsomatic.com/docs/api
// - `GET /nic/update?hostname=all.dnsomatic.com&myip={ip}` with basic auth,
//   answers `good <ip>`, `nochg <ip>`, `badauth`, ...

use async_trait::async_trait;
use dyndns_core::config::DnsOMaticConfig;
use dyndns_core::traits::DnsProvider;
use dyndns_core::{Error, Result};
use std::time::Duration;

/// DNS-O-Matic base URL
const DNSOMATIC_API_BASE: &str = "https://updates.dnsomatic.com";

/// Hostname that updates every service in the account
const ALL_HOSTS: &str = "all.dnsomatic.com";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// DNS-O-Matic provider (Provider B)
pub struct DnsOMaticProvider {
    username: String,
    /// ⚠️ NEVER log this value
    password: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for DnsOMaticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsOMaticProvider")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DnsOMaticProvider {
    /// Create a new DNS-O-Matic provider
    ///
    /// Fails if either the username or the password is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let config = DnsOMaticConfig::from_parts(username, password)
            .ok_or_else(|| Error::config("DNS-O-Matic username and password are both required"))?;
        Ok(Self::from_config(&config))
    }

    /// Create a provider from an enabled configuration
    pub fn from_config(config: &DnsOMaticConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            base_url: DNSOMATIC_API_BASE.to_string(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Send updates somewhere other than updates.dnsomatic.com
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn update_url(&self, ip: &str) -> String {
        format!(
            "{}/nic/update?hostname={}&myip={}",
            self.base_url, ALL_HOSTS, ip
        )
    }
}

#[async_trait]
impl DnsProvider for DnsOMaticProvider {
    async fn update(&self, ip: &str) -> Result<String> {
        if ip.is_empty() {
            return Err(Error::provider(
                "dnsomatic",
                "An explicit address is required",
            ));
        }

        tracing::info!("Updating DNS-O-Matic ({}) -> {}", ALL_HOSTS, ip);

        let response = self
            .client
            .get(self.update_url(ip))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| Error::provider("dnsomatic", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return match status.as_u16() {
                401 | 403 => Err(Error::provider(
                    "dnsomatic",
                    format!("Authentication failed: check DOM_USERNAME/DOM_PASSWORD. Status: {}", status),
                )),
                500..=599 => Err(Error::provider(
                    "dnsomatic",
                    format!("DNS-O-Matic server error (transient): {} - {}", status, body.trim()),
                )),
                _ => Err(Error::provider(
                    "dnsomatic",
                    format!("Update failed: {} - {}", status, body.trim()),
                )),
            };
        }

        let answer = body.trim();
        if !(answer.starts_with("good") || answer.starts_with("nochg")) {
            tracing::warn!("DNS-O-Matic did not accept the update: {}", answer);
        }

        Ok(body)
    }

    fn provider_name(&self) -> &'static str {
        "dnsomatic"
    }
}
