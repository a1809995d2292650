//! Tests for audit sink

use waitlist_bouncer::core::{build_audit_event, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        "job1",
        "jobs:waiting:alice",
        Some("jobs:queued".to_string()),
        "alice",
        "admit",
        None,
    );

    sink.record(event);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].job_id, "job1");
    assert_eq!(events[0].action, "admit");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("job1", "wl", None, "alice", "skip", None));
    sink.record(build_audit_event("job2", "wl", None, "alice", "skip", None));
    sink.record(build_audit_event("job3", "wl", None, "alice", "skip", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].job_id, "job2"); // First one popped
    assert_eq!(events[1].job_id, "job3");
}

#[test]
fn test_audit_sink_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(4);
    let mut writer = sink.clone();
    writer.record(build_audit_event("job1", "wl", None, "bob", "deny", None));
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        "job1",
        "jobs:waiting:bob",
        Some("jobs:queued".to_string()),
        "bob",
        "deny",
        Some("identifier-quota-exceeded".to_string()),
    );

    assert_eq!(event.job_id, "job1");
    assert_eq!(event.waitlist, "jobs:waiting:bob");
    assert_eq!(event.queue.as_deref(), Some("jobs:queued"));
    assert_eq!(event.identifier, "bob");
    assert_eq!(event.action, "deny");
    assert_eq!(event.detail.as_deref(), Some("identifier-quota-exceeded"));
    assert!(event.created_at_ms > 0);
    assert!(!event.event_id.is_empty());
}
