//! JSON endpoint lookup
//!
//! `GET https://api.ipify.org?format=json` answers `{"ip":"203.0.113.7"}`.

use dyndns_core::{Error, Result};
use serde_json::Value;

use crate::fetch::HttpFetcher;

/// Default JSON echo endpoint
pub const DEFAULT_JSON_ENDPOINT: &str = "https://api.ipify.org?format=json";

/// Lookup against a JSON endpoint that reports the address under `"ip"`
#[derive(Debug, Clone)]
pub struct JsonLookup {
    endpoint: String,
    fetcher: HttpFetcher,
}

impl JsonLookup {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self::with_endpoint(DEFAULT_JSON_ENDPOINT, fetcher)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, fetcher: HttpFetcher) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetcher,
        }
    }

    /// Fetch the endpoint and return the `"ip"` value
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address, or `""` when the key is missing
    /// - `Err(Error)`: Transport failure, bad status or a body that is not a JSON object
    pub async fn lookup(&self) -> Result<String> {
        let body = self.fetcher.get_text(&self.endpoint).await?;
        let json: Value = serde_json::from_str(&body)?;

        let object = json.as_object().ok_or_else(|| {
            Error::ip_source(format!("{} did not return a JSON object", self.endpoint))
        })?;

        Ok(object
            .get("ip")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
