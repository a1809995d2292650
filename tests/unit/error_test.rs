//! Tests for error types

use waitlist_bouncer::core::BouncerError;

#[test]
fn test_job_not_found_error() {
    let err = BouncerError::JobNotFound("fake01".to_string());
    assert_eq!(format!("{}", err), "job not found: fake01");
    assert!(err.is_recoverable());
}

#[test]
fn test_invalid_record_error() {
    let err = BouncerError::InvalidRecord {
        job_id: "fake02".to_string(),
        reason: "bad timestamp".to_string(),
    };
    assert_eq!(format!("{}", err), "invalid record for job fake02: bad timestamp");
    assert!(err.is_recoverable());
}

#[test]
fn test_empty_routing_stack_error() {
    let err = BouncerError::EmptyRoutingStack("fake03".to_string());
    assert_eq!(format!("{}", err), "job fake03 has an empty routing stack");
    assert!(err.is_recoverable());
}

#[test]
fn test_store_unavailable_is_fatal() {
    let err = BouncerError::StoreUnavailable("connection refused".to_string());
    assert_eq!(format!("{}", err), "store unavailable: connection refused");
    assert!(!err.is_recoverable());
}

#[test]
fn test_partial_commit_error_keeps_source() {
    let err = BouncerError::PartialCommit {
        job_id: "fake04".to_string(),
        queue: "jobs:queued".to_string(),
        source: Box::new(BouncerError::StoreUnavailable("timeout".to_string())),
    };
    assert_eq!(
        format!("{}", err),
        "job fake04 moved to jobs:queued but its record was not committed: store unavailable: timeout"
    );
    assert!(!err.is_recoverable());
    assert!(std::error::Error::source(&err).is_some());
}
