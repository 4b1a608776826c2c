//! Core traits for the updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpLookup`]: Resolve the public address with one [`LookupMethod`]
//! - [`DnsProvider`]: Push an address to a dynamic DNS service
//! - [`StateStore`]: Persist the last known address

pub mod ip_lookup;
pub mod dns_provider;
pub mod state_store;

pub use ip_lookup::{IpLookup, LookupMethod};
pub use dns_provider::DnsProvider;
pub use state_store::StateStore;
