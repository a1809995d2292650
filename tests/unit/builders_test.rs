//! Tests for builder modules

use waitlist_bouncer::builders::BouncerBuilder;
use waitlist_bouncer::config::BouncerConfig;
use waitlist_bouncer::core::BouncerError;
use waitlist_bouncer::infra::InMemoryStore;

#[test]
fn test_builder_keeps_config() {
    let config = BouncerConfig {
        controller_name: "edge".into(),
        ..BouncerConfig::default()
    };
    let builder = BouncerBuilder::new(config);
    assert_eq!(builder.config().controller_name, "edge");

    let bouncer = builder.build(InMemoryStore::new()).unwrap();
    assert_eq!(bouncer.config().controller_name, "edge");
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = BouncerConfig {
        max_jobs_per_identifier: 0,
        ..BouncerConfig::default()
    };
    let result = BouncerBuilder::new(config).build(InMemoryStore::new());
    assert!(matches!(result, Err(BouncerError::Config(_))));
}

#[test]
fn test_built_bouncer_shares_the_store() {
    let store = InMemoryStore::new();
    let bouncer = BouncerBuilder::new(BouncerConfig::default())
        .build(store.clone())
        .unwrap();

    store.push_head("jobs:waiting:alice", "j1");
    assert_eq!(bouncer.store().list("jobs:waiting:alice"), vec!["j1"]);
}
