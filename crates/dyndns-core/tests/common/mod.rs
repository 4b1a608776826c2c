//! Test doubles and common utilities for engine contract tests
//!
//! Every double records into a shared [`CallLog`] so tests can assert the
//! order in which the engine touched its collaborators.

#![allow(dead_code)]

use dyndns_core::config::DdnsConfig;
use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{DnsProvider, IpLookup, LookupMethod, StateStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered record of collaborator calls, e.g. `["lookup", "duckdns:", "store:set:1.2.3.4"]`
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }
}

/// An IpLookup that replays scripted results, then returns a fallback forever
pub struct ScriptedLookup {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback: String,
    calls: Arc<AtomicUsize>,
    methods: Arc<Mutex<Vec<LookupMethod>>>,
    log: CallLog,
}

impl ScriptedLookup {
    pub fn new(script: Vec<std::result::Result<&str, &str>>, log: CallLog) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            fallback: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            methods: Arc::new(Mutex::new(Vec::new())),
            log,
        }
    }

    /// Always resolves to `ip`
    pub fn always(ip: &str, log: CallLog) -> Self {
        let mut lookup = Self::new(Vec::new(), log);
        lookup.fallback = ip.to_string();
        lookup
    }

    /// Handle to the call counter, usable after the lookup moved into the engine
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Handle to the list of methods the engine asked for
    pub fn methods(&self) -> Arc<Mutex<Vec<LookupMethod>>> {
        Arc::clone(&self.methods)
    }
}

#[async_trait::async_trait]
impl IpLookup for ScriptedLookup {
    async fn lookup(&self, method: &LookupMethod) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.methods.lock().unwrap().push(method.clone());
        self.log.push("lookup");

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(ip)) => Ok(ip),
            Some(Err(msg)) => Err(Error::ip_source(msg)),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// A DnsProvider that records every update as `"<name>:<ip>"`
pub struct RecordingProvider {
    name: &'static str,
    infers: bool,
    fail: bool,
    log: CallLog,
}

impl RecordingProvider {
    /// Provider that needs an explicit address (like DNS-O-Matic)
    pub fn explicit(name: &'static str, log: CallLog) -> Self {
        Self {
            name,
            infers: false,
            fail: false,
            log,
        }
    }

    /// Provider that infers the address (like DuckDNS)
    pub fn inferring(name: &'static str, log: CallLog) -> Self {
        Self {
            name,
            infers: true,
            fail: false,
            log,
        }
    }

    /// Make every update fail after recording it
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn update(&self, ip: &str) -> Result<String> {
        self.log.push(format!("{}:{}", self.name, ip));
        if self.fail {
            return Err(Error::provider(self.name, "HTTP 503"));
        }
        Ok("OK".to_string())
    }

    fn infers_address(&self) -> bool {
        self.infers
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// An in-memory StateStore that records writes as `"store:set:<ip>"`
pub struct MockStateStore {
    value: Arc<Mutex<Option<String>>>,
    set_calls: Arc<AtomicUsize>,
    unreadable: bool,
    log: CallLog,
}

impl MockStateStore {
    pub fn new(initial: Option<&str>, log: CallLog) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial.map(str::to_string))),
            set_calls: Arc::new(AtomicUsize::new(0)),
            unreadable: false,
            log,
        }
    }

    /// Every read fails
    pub fn unreadable(log: CallLog) -> Self {
        let mut store = Self::new(None, log);
        store.unreadable = true;
        store
    }

    pub fn value(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.value)
    }

    pub fn set_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.set_calls)
    }
}

#[async_trait::async_trait]
impl StateStore for MockStateStore {
    async fn get_last_ip(&self) -> Result<Option<String>> {
        if self.unreadable {
            return Err(Error::state_store("permission denied"));
        }
        Ok(self.value.lock().unwrap().clone())
    }

    async fn set_last_ip(&self, ip: &str) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("store:set:{}", ip));
        *self.value.lock().unwrap() = Some(ip.to_string());
        Ok(())
    }
}

/// Helper to create a DdnsConfig for testing
pub fn test_config(max_retries: usize) -> DdnsConfig {
    DdnsConfig {
        max_retries,
        sleep_secs: 3600,
        ..DdnsConfig::new()
    }
}
