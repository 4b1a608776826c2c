// # IP Lookup Trait
//
// Defines the interface for discovering the host's public IPv4 address.
//
// ## Implementations
//
// - `dyndns-lookup` crate: `dig` against OpenDNS, a JSON echo endpoint and
//   any number of plain-text HTTP echo services
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::{IpLookup, LookupMethod};
//
// #[tokio::main]
// async fn main() -> dyndns_core::Result<()> {
//     let lookup = /* IpLookup implementation */;
//
//     let ip = lookup.lookup(&LookupMethod::Dns).await?;
//     println!("public address: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

use crate::config::ServiceDescriptor;

/// One way of asking "what is my public IP"
///
/// The pool the engine draws from holds one `Dns` entry, at most one `Json`
/// entry and one `Http` entry per configured service, so every entry is
/// equally likely to be picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMethod {
    /// DNS reflection query against a public resolver
    Dns,
    /// Dedicated JSON endpoint returning `{"ip": "..."}`
    Json,
    /// Generic plain-text HTTP endpoint
    Http(ServiceDescriptor),
}

impl LookupMethod {
    /// Build the method pool from the configured services
    pub fn pool(include_json: bool, services: &[ServiceDescriptor]) -> Vec<LookupMethod> {
        let mut pool = vec![LookupMethod::Dns];
        if include_json {
            pool.push(LookupMethod::Json);
        }
        pool.extend(services.iter().cloned().map(LookupMethod::Http));
        pool
    }
}

impl fmt::Display for LookupMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMethod::Dns => write!(f, "dns"),
            LookupMethod::Json => write!(f, "json"),
            LookupMethod::Http(service) => match &service.re {
                Some(re) => write!(f, "http: {} (re: {})", service.url, re),
                None => write!(f, "http: {}", service.url),
            },
        }
    }
}

/// Trait for IP lookup implementations
///
/// A lookup is a single attempt. An empty string means the attempt produced
/// no usable address; an `Err` means the attempt failed outright. The engine
/// treats both the same way and moves on to its next attempt.
///
/// # Rules
///
/// - One request (or one subprocess) per call
/// - No retries; the engine owns the retry budget
/// - No state between calls
#[async_trait]
pub trait IpLookup: Send + Sync {
    /// Run one lookup attempt with the given method
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The candidate address, possibly empty
    /// - `Err(Error)`: If the attempt failed
    async fn lookup(&self, method: &LookupMethod) -> Result<String, crate::Error>;
}
