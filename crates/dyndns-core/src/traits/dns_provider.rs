// # DNS Provider Trait
//
// Defines the interface for pushing the current address to a dynamic DNS
// update service.
//
// ## Implementations
//
// - DuckDNS: `dyndns-provider-duckdns` crate
// - DNS-O-Matic: `dyndns-provider-dnsomatic` crate

use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Providers are isolated and single-shot: one HTTP request per call, no
/// retries, no access to the state store. A failed update is returned as an
/// error; the engine abandons the cycle and the next cycle tries again.
///
/// # Empty addresses
///
/// The engine calls [`update`](DnsProvider::update) with an empty address
/// only when [`infers_address`](DnsProvider::infers_address) returns `true`.
/// Such providers take the address from the connecting socket.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Push an address to the provider
    ///
    /// # Parameters
    ///
    /// - `ip`: The resolved IPv4 address, or `""` for inferring providers
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The provider's response body
    /// - `Err(Error)`: Transport failure or non-2xx status
    async fn update(&self, ip: &str) -> Result<String, crate::Error>;

    /// Whether the provider can work out the address on its own
    fn infers_address(&self) -> bool {
        false
    }

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
