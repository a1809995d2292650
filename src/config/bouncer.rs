//! Bouncer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::LIST_SEPARATOR;

/// Immutable settings for one bouncer instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BouncerConfig {
    /// URI of the store holding waitlists, queues and job records.
    pub store_uri: String,
    /// Common prefix of all waitlist keys.
    pub waitlist_prefix: String,
    /// Jobs a single identifier may have in a target queue.
    pub max_jobs_per_identifier: usize,
    /// Depth above which a target queue stops accepting jobs.
    pub max_target_queue_depth: usize,
    /// Pause between two passes, in seconds.
    pub poll_interval_secs: u64,
    /// Name appended to the trace of every job this instance moves.
    pub controller_name: String,
}

impl Default for BouncerConfig {
    fn default() -> Self {
        Self {
            store_uri: "redis://localhost:6379/0".into(),
            waitlist_prefix: "jobs:waiting:".into(),
            max_jobs_per_identifier: 5,
            max_target_queue_depth: 50,
            poll_interval_secs: 60,
            controller_name: "bouncer".into(),
        }
    }
}

impl BouncerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.store_uri.trim().is_empty() {
            return Err("store_uri must not be empty".into());
        }
        if self.waitlist_prefix.is_empty() {
            return Err("waitlist_prefix must not be empty".into());
        }
        if self.max_jobs_per_identifier == 0 {
            return Err("max_jobs_per_identifier must be greater than 0".into());
        }
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than 0".into());
        }
        if self.controller_name.trim().is_empty() {
            return Err("controller_name must not be empty".into());
        }
        if self.controller_name.contains(LIST_SEPARATOR) {
            return Err(format!(
                "controller_name must not contain `{LIST_SEPARATOR}`"
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Pause between passes.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
