//! Tests for configuration validation

use waitlist_bouncer::config::BouncerConfig;

#[test]
fn test_default_config_is_valid() {
    let config = BouncerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.waitlist_prefix, "jobs:waiting:");
    assert_eq!(config.max_jobs_per_identifier, 5);
    assert_eq!(config.poll_interval().as_secs(), 60);
}

#[test]
fn test_config_invalid_max_jobs() {
    let invalid = BouncerConfig {
        max_jobs_per_identifier: 0,
        ..BouncerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_zero_depth_is_allowed() {
    let config = BouncerConfig {
        max_target_queue_depth: 0,
        ..BouncerConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_invalid_interval() {
    let invalid = BouncerConfig {
        poll_interval_secs: 0,
        ..BouncerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_prefix() {
    let invalid = BouncerConfig {
        waitlist_prefix: String::new(),
        ..BouncerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_controller_name() {
    let empty = BouncerConfig {
        controller_name: "  ".into(),
        ..BouncerConfig::default()
    };
    assert!(empty.validate().is_err());

    let with_separator = BouncerConfig {
        controller_name: "bouncer,one".into(),
        ..BouncerConfig::default()
    };
    let err = with_separator.validate().unwrap_err();
    assert!(err.contains("controller_name"));
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "store_uri": "redis://cache:6379/2",
        "waitlist_prefix": "fake:waiting:",
        "max_jobs_per_identifier": 1,
        "max_target_queue_depth": 10,
        "poll_interval_secs": 5,
        "controller_name": "fake-bouncer"
    }"#;

    let config = BouncerConfig::from_json_str(json).unwrap();
    assert_eq!(config.store_uri, "redis://cache:6379/2");
    assert_eq!(config.max_jobs_per_identifier, 1);
    assert_eq!(config.controller_name, "fake-bouncer");
}

#[test]
fn test_config_from_json_fills_defaults() {
    let config = BouncerConfig::from_json_str(r#"{"controller_name": "edge"}"#).unwrap();
    assert_eq!(config.controller_name, "edge");
    assert_eq!(config.max_target_queue_depth, 50);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(BouncerConfig::from_json_str(r#"{"poll_interval_secs": 0}"#).is_err());
    assert!(BouncerConfig::from_json_str("not json").is_err());
}
