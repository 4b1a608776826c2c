// # dyndnsd - Dynamic DNS Updater Daemon
//
// Thin integration layer: it reads the configuration, installs logging,
// wires the lookup methods, providers and state file into a `DdnsEngine`
// and runs it until the process is killed. All updater logic lives in
// dyndns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Schedule
// - `SLEEP_SECS`: Pause between cycles in seconds (default 3600)
// - `MAX_RETRIES`: Extra lookup attempts per cycle (default 3)
//
// ### Providers
// - `DUCK_DOMAINS`, `DUCK_TOKEN`: Enable DuckDNS (both required)
// - `DOM_USERNAME`, `DOM_PASSWORD`: Enable DNS-O-Matic (both required)
//
// ### Lookup
// - `HTTP_SERVICES`: Path to a JSON array of `{"url": ..., "re": ...}`
// - `USER_AGENT`: User-Agent header for lookup requests
//
// ### Misc
// - `LAST_IP_FILE`: Last known address record (default /tmp/last_ip)
// - `LOG_LEVEL`: trace, debug, info, warn(ing), error or critical (default info)
//
// ## Example
//
// ```bash
// export DUCK_DOMAINS=myhome,mycabin
// export DUCK_TOKEN=your_token
// export SLEEP_SECS=600
//
// dyndnsd
// ```

use anyhow::{Context, Result};
use dyndns_core::traits::DnsProvider;
use dyndns_core::{DdnsConfig, DdnsEngine, FileStateStore};
use dyndns_lookup::PublicIpLookup;
use dyndns_provider_dnsomatic::DnsOMaticProvider;
use dyndns_provider_duckdns::DuckDnsProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Map `LOG_LEVEL` to a tracing level
///
/// `warning` and `critical` are accepted as aliases of `warn` and `error`.
/// Anything unrecognized falls back to INFO.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    // Logging comes first so configuration warnings are not lost
    let log_level = parse_level(&env::var("LOG_LEVEL").unwrap_or_default());
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match DdnsConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Everything is sequential; one thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let engine = match build_engine(&config).await {
            Ok(engine) => engine,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DdnsExitCode::ConfigError;
            }
        };

        match engine.run().await {
            Ok(()) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire the configured components into an engine
async fn build_engine(config: &DdnsConfig) -> Result<DdnsEngine> {
    let mut providers: Vec<Box<dyn DnsProvider>> = Vec::new();
    if let Some(duckdns) = &config.duckdns {
        providers.push(Box::new(DuckDnsProvider::from_config(duckdns)));
    }
    if let Some(dnsomatic) = &config.dnsomatic {
        providers.push(Box::new(DnsOMaticProvider::from_config(dnsomatic)));
    }

    let state_store = FileStateStore::new(&config.state_path)
        .await
        .with_context(|| format!("Cannot use {}", config.state_path.display()))?;

    info!(
        "Sleep pause: {}s HTTP Services: {} DuckDNS: {} DNS-O-Matic: {}",
        config.sleep_secs,
        config.services.len(),
        config.duckdns.is_some(),
        config.dnsomatic.is_some()
    );

    Ok(DdnsEngine::new(
        Box::new(PublicIpLookup::new(config.user_agent.clone())),
        providers,
        Box::new(state_store),
        config,
    ))
}
