//! Configuration types for the dynamic DNS updater
//!
//! This module defines all configuration structures used throughout the
//! workspace. A single [`DdnsConfig`] is built once at startup (normally from
//! environment variables) and handed to the daemon wiring; nothing reads the
//! environment after that.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default pause between cycles (in seconds)
pub const DEFAULT_SLEEP_SECS: u64 = 3600;

/// Default number of extra lookup attempts per cycle
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Default location of the last known address record
pub const DEFAULT_STATE_PATH: &str = "/tmp/last_ip";

/// IP-echo services used when `HTTP_SERVICES` is not set
pub const DEFAULT_HTTP_SERVICES: &[&str] = &[
    "ifconfig.co",
    "ipecho.net/plain",
    "ipv4.icanhazip.com",
    "whatismyip.akamai.com",
    "v4.ident.me",
    "ipinfo.io/ip",
    "www.trackip.net/ip",
    "ip.tyk.nu",
    "api.ipify.org",
    "myexternalip.com/raw",
    "wgetip.com",
];

/// One generic HTTP IP-echo endpoint
///
/// Loaded from the `HTTP_SERVICES` file as `{"url": "...", "re": "..."}`.
/// When `re` is set it must contain a named group `ip`; when it is not, the
/// response body has to start with a dotted quad.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceDescriptor {
    /// Endpoint URL, scheme optional
    pub url: String,

    /// Optional extraction pattern with a named `ip` capture group
    #[serde(default)]
    pub re: Option<String>,
}

impl ServiceDescriptor {
    /// Create a descriptor without an extraction pattern
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            re: None,
        }
    }

    /// Set the extraction pattern
    pub fn with_pattern(mut self, re: impl Into<String>) -> Self {
        self.re = Some(re.into());
        self
    }

    /// The URL to request, with `https://` prefixed when no scheme is given
    pub fn request_url(&self) -> String {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            self.url.clone()
        } else {
            format!("https://{}", self.url)
        }
    }
}

/// Built-in service list, used when no services file is configured
pub fn default_services() -> Vec<ServiceDescriptor> {
    DEFAULT_HTTP_SERVICES
        .iter()
        .map(|url| ServiceDescriptor::new(*url))
        .collect()
}

/// Load service descriptors from a JSON file
///
/// A missing or unreadable file is reported as [`Error::Io`], malformed
/// content as [`Error::Json`].
pub fn load_services(path: impl AsRef<Path>) -> Result<Vec<ServiceDescriptor>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let services = serde_json::from_str(&content)?;
    Ok(services)
}

/// DuckDNS credentials (Provider A)
#[derive(Clone, PartialEq, Eq)]
pub struct DuckDnsConfig {
    /// Comma separated list of DuckDNS subdomains
    pub domains: String,
    /// Account token
    /// ⚠️ NEVER log this value
    pub token: String,
}

impl DuckDnsConfig {
    /// Returns `Some` only when both fields are non-empty
    pub fn from_parts(domains: impl Into<String>, token: impl Into<String>) -> Option<Self> {
        let domains = domains.into();
        let token = token.into();
        if domains.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self { domains, token })
    }
}

impl std::fmt::Debug for DuckDnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDnsConfig")
            .field("domains", &self.domains)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

/// DNS-O-Matic credentials (Provider B)
#[derive(Clone, PartialEq, Eq)]
pub struct DnsOMaticConfig {
    pub username: String,
    /// ⚠️ NEVER log this value
    pub password: String,
}

impl DnsOMaticConfig {
    /// Returns `Some` only when both fields are non-empty
    pub fn from_parts(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

impl std::fmt::Debug for DnsOMaticConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsOMaticConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Main updater configuration
#[derive(Debug, Clone)]
pub struct DdnsConfig {
    /// Pause between cycles (in seconds)
    pub sleep_secs: u64,

    /// Extra lookup attempts beyond the first, per cycle
    pub max_retries: usize,

    /// DuckDNS, if enabled
    pub duckdns: Option<DuckDnsConfig>,

    /// DNS-O-Matic, if enabled
    pub dnsomatic: Option<DnsOMaticConfig>,

    /// Generic HTTP IP-echo services
    pub services: Vec<ServiceDescriptor>,

    /// User-Agent header for lookup requests
    pub user_agent: Option<String>,

    /// Location of the last known address record
    pub state_path: PathBuf,
}

impl DdnsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            sleep_secs: DEFAULT_SLEEP_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            duckdns: None,
            dnsomatic: None,
            services: default_services(),
            user_agent: None,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Recognized variables: `SLEEP_SECS`, `MAX_RETRIES`, `DUCK_DOMAINS`,
    /// `DUCK_TOKEN`, `DOM_USERNAME`, `DOM_PASSWORD`, `HTTP_SERVICES`,
    /// `USER_AGENT` and `LAST_IP_FILE`. `LOG_LEVEL` belongs to the daemon,
    /// which needs it before any configuration is loaded.
    ///
    /// Only malformed numbers are errors. A services file that cannot be
    /// read or parsed degrades to an empty service list with a warning.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let services = match lookup("HTTP_SERVICES").filter(|p| !p.is_empty()) {
            Some(path) => match load_services(&path) {
                Ok(services) => services,
                Err(Error::Io(e)) => {
                    tracing::warn!("Cannot read HTTP services file {}: {}", path, e);
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!("Invalid HTTP services file {}: {}", path, e);
                    Vec::new()
                }
            },
            None => default_services(),
        };

        Ok(Self {
            sleep_secs: parse_or("SLEEP_SECS", lookup("SLEEP_SECS"), DEFAULT_SLEEP_SECS)?,
            max_retries: parse_or("MAX_RETRIES", lookup("MAX_RETRIES"), DEFAULT_MAX_RETRIES)?,
            duckdns: DuckDnsConfig::from_parts(var("DUCK_DOMAINS"), var("DUCK_TOKEN")),
            dnsomatic: DnsOMaticConfig::from_parts(var("DOM_USERNAME"), var("DOM_PASSWORD")),
            services,
            user_agent: lookup("USER_AGENT").filter(|ua| !ua.is_empty()),
            state_path: lookup("LAST_IP_FILE")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
        })
    }
}

impl Default for DdnsConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::config(format!("{} must be a non-negative integer. Got: {}", key, raw))),
    }
}
