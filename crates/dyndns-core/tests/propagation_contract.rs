//! Contract Test: Update Propagation
//!
//! Constraints verified:
//! - Inferring providers are called on every change, even with no address
//! - Explicit providers are called only with a non-empty address
//! - Providers are called in configuration order

mod common;

use common::*;
use dyndns_core::{CycleOutcome, DdnsEngine};

#[tokio::test]
async fn changed_address_reaches_both_providers() {
    // last-known = "1.2.3.4", resolved = "5.6.7.8", both providers enabled
    let log = CallLog::new();
    let store = MockStateStore::new(Some("1.2.3.4"), log.clone());
    let value = store.value();

    let engine = DdnsEngine::new(
        Box::new(ScriptedLookup::always("5.6.7.8", log.clone())),
        vec![
            Box::new(RecordingProvider::inferring("duckdns", log.clone())),
            Box::new(RecordingProvider::explicit("dnsomatic", log.clone())),
        ],
        Box::new(store),
        &test_config(3),
    );

    engine.run_cycle().await.unwrap();

    assert_eq!(log.matching("duckdns"), vec!["duckdns:".to_string()]);
    assert_eq!(log.matching("dnsomatic"), vec!["dnsomatic:5.6.7.8".to_string()]);
    assert_eq!(value.lock().unwrap().as_deref(), Some("5.6.7.8"));
}

#[tokio::test]
async fn empty_address_only_reaches_inferring_provider() {
    // Retries exhausted, resolved = ""
    let log = CallLog::new();
    let store = MockStateStore::new(Some("1.2.3.4"), log.clone());

    let engine = DdnsEngine::new(
        Box::new(ScriptedLookup::new(vec![Err("timeout")], log.clone())),
        vec![
            Box::new(RecordingProvider::inferring("duckdns", log.clone())),
            Box::new(RecordingProvider::explicit("dnsomatic", log.clone())),
        ],
        Box::new(store),
        &test_config(3),
    );

    let outcome = engine.run_cycle().await.unwrap();

    assert_eq!(log.matching("lookup").len(), 4);
    assert_eq!(log.matching("duckdns"), vec!["duckdns:".to_string()]);
    assert!(log.matching("dnsomatic").is_empty());
    assert_eq!(
        outcome,
        CycleOutcome::Updated {
            previous_ip: "1.2.3.4".to_string(),
            new_ip: String::new(),
        }
    );
}

#[tokio::test]
async fn no_providers_still_persists_change() {
    let log = CallLog::new();
    let store = MockStateStore::new(None, log.clone());
    let value = store.value();

    let engine = DdnsEngine::new(
        Box::new(ScriptedLookup::always("5.6.7.8", log.clone())),
        Vec::new(),
        Box::new(store),
        &test_config(3),
    );

    engine.run_cycle().await.unwrap();

    assert_eq!(value.lock().unwrap().as_deref(), Some("5.6.7.8"));
}

#[tokio::test]
async fn providers_called_in_configured_order() {
    let log = CallLog::new();

    let engine = DdnsEngine::new(
        Box::new(ScriptedLookup::always("5.6.7.8", log.clone())),
        vec![
            Box::new(RecordingProvider::explicit("first", log.clone())),
            Box::new(RecordingProvider::inferring("second", log.clone())),
            Box::new(RecordingProvider::explicit("third", log.clone())),
        ],
        Box::new(MockStateStore::new(None, log.clone())),
        &test_config(0),
    );

    engine.run_cycle().await.unwrap();

    assert_eq!(
        log.entries(),
        vec![
            "lookup".to_string(),
            "first:5.6.7.8".to_string(),
            "second:5.6.7.8".to_string(),
            "third:5.6.7.8".to_string(),
            "store:set:5.6.7.8".to_string(),
        ]
    );
}
