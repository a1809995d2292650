//! Error types for bouncer operations.

use thiserror::Error;

/// Errors produced by the admission controller and its store gateway.
#[derive(Debug, Error)]
pub enum BouncerError {
    /// A job id did not resolve to any stored record.
    #[error("job not found: {0}")]
    JobNotFound(String),
    /// A job record exists but could not be parsed.
    #[error("invalid record for job {job_id}: {reason}")]
    InvalidRecord {
        /// Job identifier.
        job_id: String,
        /// What was wrong with the record.
        reason: String,
    },
    /// A job has no remaining destination to move to.
    #[error("job {0} has an empty routing stack")]
    EmptyRoutingStack(String),
    /// Store connectivity or command failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// The job reached its target queue but its audit fields were not persisted.
    #[error("job {job_id} moved to {queue} but its record was not committed: {source}")]
    PartialCommit {
        /// Job identifier.
        job_id: String,
        /// Queue the job was moved into.
        queue: String,
        /// Failure raised while committing the record.
        #[source]
        source: Box<BouncerError>,
    },
    /// Configuration was rejected before startup.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BouncerError {
    /// Whether the error only means "skip this waitlist for the current tick".
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::JobNotFound(_) | Self::InvalidRecord { .. } | Self::EmptyRoutingStack(_)
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
