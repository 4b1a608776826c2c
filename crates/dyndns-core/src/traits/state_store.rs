// # State Store Trait
//
// Defines the interface for persisting the last known address.
//
// ## Purpose
//
// The state store keeps the address that was last propagated, so restarts
// and repeated cycles with an unchanged address never reach a provider.
//
// ## Implementations
//
// - File-based: raw text file, see `state::FileStateStore`

use async_trait::async_trait;

/// Trait for state store implementations
///
/// # Rules
///
/// - Async I/O only
/// - `set_last_ip` is durable when it returns
/// - No business logic (the engine decides when to write)
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the last known address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The stored address
    /// - `Ok(None)`: Nothing stored yet
    /// - `Err(Error)`: The record exists but cannot be read
    async fn get_last_ip(&self) -> Result<Option<String>, crate::Error>;

    /// Replace the stored address
    async fn set_last_ip(&self, ip: &str) -> Result<(), crate::Error>;
}
