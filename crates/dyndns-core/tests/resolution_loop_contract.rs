//! Contract Test: Resolution Loop
//!
//! Constraints verified:
//! - At most `max_retries + 1` lookup attempts per cycle
//! - The loop stops at the first non-empty result
//! - A failing attempt is contained and counted like an empty one
//! - Methods are drawn from the whole pool

mod common;

use common::*;
use dyndns_core::config::ServiceDescriptor;
use dyndns_core::{DdnsEngine, LookupMethod};
use std::sync::atomic::Ordering;

fn engine_with(lookup: ScriptedLookup, max_retries: usize, log: &CallLog) -> DdnsEngine {
    DdnsEngine::new(
        Box::new(lookup),
        Vec::new(),
        Box::new(MockStateStore::new(None, log.clone())),
        &test_config(max_retries),
    )
}

#[tokio::test]
async fn stops_at_first_non_empty_result() {
    let log = CallLog::new();
    let lookup = ScriptedLookup::new(vec![Ok(""), Ok("5.6.7.8"), Ok("9.9.9.9")], log.clone());
    let calls = lookup.calls();

    let engine = engine_with(lookup, 3, &log);
    let ip = engine.resolve_ip().await;

    assert_eq!(ip, "5.6.7.8");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn makes_at_most_max_retries_plus_one_attempts() {
    for max_retries in [0, 1, 3, 7] {
        let log = CallLog::new();
        let lookup = ScriptedLookup::new(Vec::new(), log.clone());
        let calls = lookup.calls();

        let engine = engine_with(lookup, max_retries, &log);
        let ip = engine.resolve_ip().await;

        assert_eq!(ip, "", "exhausted retries must yield an empty address");
        assert_eq!(
            calls.load(Ordering::SeqCst),
            max_retries + 1,
            "max_retries = {}",
            max_retries
        );
    }
}

#[tokio::test]
async fn failed_attempts_are_contained() {
    let log = CallLog::new();
    let lookup = ScriptedLookup::new(
        vec![Err("dig exited with status 9"), Err("connection refused"), Ok("1.2.3.4")],
        log.clone(),
    );
    let calls = lookup.calls();

    let engine = engine_with(lookup, 3, &log);
    let ip = engine.resolve_ip().await;

    assert_eq!(ip, "1.2.3.4");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn failures_consume_the_retry_budget() {
    let log = CallLog::new();
    let lookup = ScriptedLookup::new(
        vec![Err("boom"), Err("boom"), Ok("1.2.3.4")],
        log.clone(),
    );
    let calls = lookup.calls();

    // Only two attempts allowed, the address comes on the third
    let engine = engine_with(lookup, 1, &log);
    assert_eq!(engine.resolve_ip().await, "");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_pool_yields_empty_address() {
    let log = CallLog::new();
    let lookup = ScriptedLookup::always("1.2.3.4", log.clone());
    let calls = lookup.calls();

    let engine = engine_with(lookup, 3, &log).with_pool(Vec::new());

    assert_eq!(engine.resolve_ip().await, "");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_pool_entry_gets_picked() {
    let log = CallLog::new();
    let lookup = ScriptedLookup::new(Vec::new(), log.clone());
    let methods = lookup.methods();

    let services = vec![ServiceDescriptor::new("ifconfig.co")];
    let config = dyndns_core::DdnsConfig {
        services: services.clone(),
        ..test_config(299)
    };
    let engine = DdnsEngine::new(
        Box::new(lookup),
        Vec::new(),
        Box::new(MockStateStore::new(None, log.clone())),
        &config,
    );
    assert_eq!(engine.pool().len(), 3);

    engine.resolve_ip().await;

    let seen = methods.lock().unwrap().clone();
    assert_eq!(seen.len(), 300);
    assert!(seen.contains(&LookupMethod::Dns));
    assert!(seen.contains(&LookupMethod::Json));
    assert!(seen.contains(&LookupMethod::Http(services[0].clone())));
}
