//! Core updater engine
//!
//! The DdnsEngine is responsible for:
//! - Resolving the public address through a randomly chosen lookup method
//! - Comparing it with the last known address
//! - Pushing changes to every configured DnsProvider
//! - Persisting the address after successful propagation
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────┐
//!                  │  DdnsEngine  │◄──── sleep(interval) ────┐
//!                  └──────────────┘                          │
//!                         │                                  │
//!      ┌──────────────────┼──────────────────┐               │
//!      │                  │                  │               │
//!      ▼                  ▼                  ▼               │
//! ┌──────────┐     ┌─────────────┐    ┌─────────────┐        │
//! │ IpLookup │     │ StateStore  │    │ DnsProvider │ ───────┘
//! │ (random) │     │ (compare)   │    │ (in order)  │
//! └──────────┘     └─────────────┘    └─────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Try lookup methods until one yields an address (at most `max_retries + 1` attempts)
//! 2. Read the last known address
//! 3. If unchanged, stop here
//! 4. Call every provider, in order
//! 5. On success, persist the new address
//! 6. Sleep, repeat

use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{debug, error, info, warn};

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, IpLookup, LookupMethod, StateStore};

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Resolved address equals the last known one; nothing was sent
    Unchanged {
        ip: String,
    },

    /// Providers were notified and the record was overwritten
    Updated {
        previous_ip: String,
        new_ip: String,
    },
}

/// Core updater engine
///
/// The engine runs resolve → compare → propagate → persist → sleep forever.
/// Everything is awaited in sequence; lookup attempts, provider calls and
/// cycles never overlap.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`]
/// 3. The engine runs until the process is killed
pub struct DdnsEngine {
    /// Lookup dispatcher
    lookup: Box<dyn IpLookup>,

    /// Methods to draw from, one entry each
    pool: Vec<LookupMethod>,

    /// Providers, called in this order
    providers: Vec<Box<dyn DnsProvider>>,

    /// Last known address record
    state_store: Box<dyn StateStore>,

    /// Extra lookup attempts beyond the first
    max_retries: usize,

    /// Pause between cycles
    sleep_interval: Duration,
}

impl DdnsEngine {
    /// Create a new engine
    ///
    /// The lookup pool holds the DNS method, the JSON method and one entry
    /// per service in `config.services`.
    pub fn new(
        lookup: Box<dyn IpLookup>,
        providers: Vec<Box<dyn DnsProvider>>,
        state_store: Box<dyn StateStore>,
        config: &DdnsConfig,
    ) -> Self {
        Self {
            lookup,
            pool: LookupMethod::pool(true, &config.services),
            providers,
            state_store,
            max_retries: config.max_retries,
            sleep_interval: Duration::from_secs(config.sleep_secs),
        }
    }

    /// Replace the lookup pool
    pub fn with_pool(mut self, pool: Vec<LookupMethod>) -> Self {
        self.pool = pool;
        self
    }

    /// The methods this engine draws from
    pub fn pool(&self) -> &[LookupMethod] {
        &self.pool
    }

    /// Run the engine
    ///
    /// Cycle errors are logged and the loop carries on after the usual
    /// sleep. This never returns under normal operation.
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    async fn run_internal(
        &self,
        mut shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        loop {
            match self.run_cycle().await {
                Ok(CycleOutcome::Unchanged { ip }) => {
                    debug!("IP unchanged ({:?}), nothing to do", ip);
                }
                Ok(CycleOutcome::Updated { previous_ip, new_ip }) => {
                    info!("IP updated: {:?} -> {:?}", previous_ip, new_ip);
                }
                Err(e) => {
                    error!("Update cycle failed: {}", e);
                }
            }

            info!("Waiting for {} seconds...", self.sleep_interval.as_secs());
            match shutdown_rx.as_mut() {
                Some(rx) => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.sleep_interval) => {}
                        _ = rx => {
                            info!("Shutdown signal received");
                            break;
                        }
                    }
                }
                None => tokio::time::sleep(self.sleep_interval).await,
            }
        }

        Ok(())
    }

    /// Run a single cycle without sleeping
    ///
    /// # Returns
    ///
    /// - `Ok(CycleOutcome)`: What the cycle did
    /// - `Err(Error)`: A provider or the state store failed; the record was
    ///   not overwritten
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let ip = self.resolve_ip().await;
        info!("Updating IP to: {:?}", ip);

        let last_ip = self.last_ip().await;
        if ip == last_ip {
            return Ok(CycleOutcome::Unchanged { ip });
        }

        self.propagate(&ip).await?;
        self.state_store.set_last_ip(&ip).await?;

        Ok(CycleOutcome::Updated {
            previous_ip: last_ip,
            new_ip: ip,
        })
    }

    /// Resolve the current public address
    ///
    /// Picks a method at random for every attempt and stops at the first
    /// non-empty result. The loop allows attempts while the attempt count is
    /// `<= max_retries`, so at most `max_retries + 1` lookups are made.
    /// Failed attempts are logged and counted like empty ones.
    ///
    /// # Returns
    ///
    /// The address, or `""` when every attempt came back empty.
    pub async fn resolve_ip(&self) -> String {
        let mut ip = String::new();
        let mut attempts = 0;

        while ip.is_empty() && attempts <= self.max_retries {
            let Some(method) = self.pick_method() else {
                warn!("No lookup methods configured");
                break;
            };

            ip = match self.lookup.lookup(method).await {
                Ok(ip) => ip,
                Err(e) => {
                    warn!("Lookup via {} failed: {}", method, e);
                    String::new()
                }
            };
            info!("Got {:?} from {}", ip, method);
            attempts += 1;
        }

        if ip.is_empty() {
            warn!("No address after {} attempt(s)", attempts);
        }
        ip
    }

    fn pick_method(&self) -> Option<&LookupMethod> {
        let mut rng = rand::thread_rng();
        self.pool.choose(&mut rng)
    }

    /// Last known address, `""` when absent or unreadable
    async fn last_ip(&self) -> String {
        match self.state_store.get_last_ip().await {
            Ok(Some(ip)) => ip,
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Cannot read last known IP, treating as empty: {}", e);
                String::new()
            }
        }
    }

    /// Push an address to every provider, in order
    ///
    /// Inferring providers always receive `""`. The others receive `ip` and
    /// are skipped when it is empty. The first failure aborts propagation.
    async fn propagate(&self, ip: &str) -> Result<()> {
        for provider in &self.providers {
            if ip.is_empty() && !provider.infers_address() {
                debug!(
                    "Skipping {}: no address to send",
                    provider.provider_name()
                );
                continue;
            }

            // Inferring providers take the address from the connection
            let sent = if provider.infers_address() { "" } else { ip };
            let body = provider.update(sent).await?;
            info!("{} response: {}", provider.provider_name(), body.trim());
        }

        Ok(())
    }

    /// Test-only helper to run the engine with a controlled shutdown signal
    ///
    /// **TESTING ONLY**: the daemon uses `run()`, which only stops when the
    /// process is killed. The signal interrupts the sleep between cycles.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}
