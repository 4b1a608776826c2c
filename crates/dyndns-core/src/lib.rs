// # dyndns-core
//
// Core library for the polling dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpLookup**: Trait for resolving the public IPv4 address with one `LookupMethod`
// - **DnsProvider**: Trait for pushing an address to a dynamic DNS service
// - **StateStore**: Trait for persisting the last known address across restarts
// - **DdnsEngine**: Resolve → compare → propagate → persist → sleep, forever
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from transports
// 2. **Sequential**: One lookup attempt at a time, cycles never overlap
// 3. **Explicit Configuration**: One immutable `DdnsConfig`, built once at startup
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: Unchanged addresses never reach a provider

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{IpLookup, DnsProvider, StateStore, LookupMethod};
pub use engine::{DdnsEngine, CycleOutcome};
pub use config::{DdnsConfig, ServiceDescriptor, DuckDnsConfig, DnsOMaticConfig};
pub use error::{Error, Result};
pub use state::FileStateStore;
