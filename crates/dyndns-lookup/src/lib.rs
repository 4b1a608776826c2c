// # Public IP Lookup
//
// This crate provides the lookup methods the engine draws from:
//
// - `dns`: `dig +short myip.opendns.com @resolver1.opendns.com`
// - `json`: `https://api.ipify.org?format=json`, key `"ip"`
// - `http`: any plain-text echo service, optionally with an extraction pattern
//
// ## Failure containment
//
// The plain-text HTTP method swallows every failure and reports `""`. The
// DNS and JSON methods return errors, which the engine logs and counts as
// an empty attempt. Either way one bad service never fails a cycle.

pub mod dns;
pub mod fetch;
pub mod http;
pub mod json;

pub use dns::DigLookup;
pub use fetch::HttpFetcher;
pub use http::{HttpTextLookup, extract_ip};
pub use json::JsonLookup;

use async_trait::async_trait;
use dyndns_core::traits::{IpLookup, LookupMethod};
use dyndns_core::Result;

/// Dispatches a [`LookupMethod`] to its implementation
#[derive(Debug, Clone)]
pub struct PublicIpLookup {
    dig: DigLookup,
    json: JsonLookup,
    http: HttpTextLookup,
}

impl PublicIpLookup {
    /// Default endpoints; `user_agent` is sent with every HTTP lookup
    pub fn new(user_agent: Option<String>) -> Self {
        let fetcher = HttpFetcher::new(user_agent);
        Self {
            dig: DigLookup::new(),
            json: JsonLookup::new(fetcher.clone()),
            http: HttpTextLookup::new(fetcher),
        }
    }

    /// Assemble from individually configured methods
    pub fn from_parts(dig: DigLookup, json: JsonLookup, http: HttpTextLookup) -> Self {
        Self { dig, json, http }
    }
}

#[async_trait]
impl IpLookup for PublicIpLookup {
    async fn lookup(&self, method: &LookupMethod) -> Result<String> {
        match method {
            LookupMethod::Dns => self.dig.lookup().await,
            LookupMethod::Json => self.json.lookup().await,
            LookupMethod::Http(service) => Ok(self.http.lookup(service).await),
        }
    }
}
