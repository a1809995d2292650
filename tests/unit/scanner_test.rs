//! Tests for waitlist scanning and candidate resolution

use std::collections::HashMap;

use waitlist_bouncer::core::{next_candidate, scan_waitlists, BouncerError, Job, Waitlist};
use waitlist_bouncer::infra::InMemoryStore;

#[tokio::test]
async fn test_scan_extracts_identifiers() {
    let store = InMemoryStore::new();
    store.push_head("jobs:waiting:alice@example.org", "j1");
    store.push_head("jobs:waiting:10.0.0.1", "j2");
    store.push_head("jobs:queued", "j3");

    let mut identifiers: Vec<String> = scan_waitlists(&store, "jobs:waiting:")
        .await
        .unwrap()
        .into_iter()
        .map(|wl| wl.identifier)
        .collect();
    identifiers.sort();
    assert_eq!(identifiers, vec!["10.0.0.1", "alice@example.org"]);
}

#[tokio::test]
async fn test_empty_waitlist_has_no_candidate() {
    let store = InMemoryStore::new();
    let wl = Waitlist::from_key("jobs:waiting:nobody");
    assert!(next_candidate(&store, &wl).await.unwrap().is_none());
}

#[tokio::test]
async fn test_candidate_is_oldest_entry() {
    let store = InMemoryStore::new();
    for id in ["old", "new"] {
        let mut job = Job::new(id);
        job.email = Some("alice@example.org".into());
        job.target_queues.push("jobs:queued".into());
        store.insert_job(&job);
        store.push_head("jobs:waiting:alice@example.org", id);
    }

    let wl = Waitlist::from_key("jobs:waiting:alice@example.org");
    let candidate = next_candidate(&store, &wl).await.unwrap().unwrap();
    assert_eq!(candidate.job_id(), "old");
    assert_eq!(candidate.target_queue, "jobs:queued");
}

#[tokio::test]
async fn test_unresolvable_candidate_is_recoverable() {
    let store = InMemoryStore::new();
    store.push_head("jobs:waiting:eve", "dangling");
    let wl = Waitlist::from_key("jobs:waiting:eve");

    let err = next_candidate(&store, &wl).await.unwrap_err();
    assert!(matches!(err, BouncerError::JobNotFound(ref id) if id == "dangling"));
    assert!(err.is_recoverable());

    let mut fields = HashMap::new();
    fields.insert("email".to_string(), "eve".to_string());
    store.insert_raw_job("dangling", fields);
    let err = next_candidate(&store, &wl).await.unwrap_err();
    assert!(matches!(err, BouncerError::EmptyRoutingStack(_)));

    assert_eq!(store.list("jobs:waiting:eve"), vec!["dangling"]);
}
