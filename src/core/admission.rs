//! Admission guards.
//!
//! Two independent ceilings gate every move:
//!
//! - **Target depth**: the target queue may be *at* its configured maximum and
//!   still accept a job; only a queue strictly deeper than the maximum denies.
//! - **Per-identifier occupancy**: the submitter may have strictly fewer than
//!   the configured maximum of jobs in the target queue; reaching the maximum
//!   denies.
//!
//! The depth guard runs first so a saturated queue is never scanned.
//!
//! Decisions are computed from a read of the queue and acted on afterwards.
//! Nothing holds the queue in between, so concurrent producers or a second
//! bouncer instance can push a submitter past its ceiling.

use std::fmt;

use crate::config::BouncerConfig;
use crate::core::{BouncerError, JobStore};

/// Ceilings enforced by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionLimits {
    /// Jobs one identifier may have in a target queue before it is throttled.
    pub max_jobs_per_identifier: usize,
    /// Depth above which a target queue accepts nothing.
    pub max_target_queue_depth: usize,
}

impl From<&BouncerConfig> for AdmissionLimits {
    fn from(cfg: &BouncerConfig) -> Self {
        Self {
            max_jobs_per_identifier: cfg.max_jobs_per_identifier,
            max_target_queue_depth: cfg.max_target_queue_depth,
        }
    }
}

/// Why a waitlist was not allowed to move this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The target queue is deeper than its ceiling.
    TargetQueueFull {
        /// Observed depth.
        depth: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// The identifier already holds its share of the target queue.
    IdentifierQuotaExceeded {
        /// Jobs of this identifier already queued.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },
}

impl DenyReason {
    /// Stable short code for logs and audit records.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TargetQueueFull { .. } => "target-queue-full",
            Self::IdentifierQuotaExceeded { .. } => "identifier-quota-exceeded",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetQueueFull { depth, max } => {
                write!(f, "{} (depth {depth} > {max})", self.code())
            }
            Self::IdentifierQuotaExceeded { count, max } => {
                write!(f, "{} ({count} >= {max})", self.code())
            }
        }
    }
}

/// Outcome of evaluating the guards for one waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Move the job.
    Admit,
    /// Leave the job where it is.
    Deny(DenyReason),
}

impl Decision {
    /// True for [`Decision::Admit`].
    pub const fn is_admit(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Count jobs in `queue` that belong to `identifier`.
///
/// A job matching on both account and address is counted once. Queue entries
/// that no longer resolve to a readable record are not counted; store
/// failures propagate.
pub async fn count_identifiers_in_queue<S>(
    store: &S,
    identifier: &str,
    queue: &str,
) -> Result<usize, BouncerError>
where
    S: JobStore + ?Sized,
{
    let mut count = 0;
    for job_id in store.list_entries(queue).await? {
        match store.fetch_job(&job_id).await {
            Ok(job) => {
                if job.matches_identifier(identifier) {
                    count += 1;
                }
            }
            Err(err) if err.is_recoverable() => {
                tracing::debug!("ignoring unreadable job {job_id} in {queue}: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(count)
}

/// Decide whether a job from `identifier`'s waitlist may enter `queue`.
pub async fn evaluate<S>(
    store: &S,
    limits: AdmissionLimits,
    identifier: &str,
    queue: &str,
) -> Result<Decision, BouncerError>
where
    S: JobStore + ?Sized,
{
    let depth = store.list_len(queue).await?;
    if depth > limits.max_target_queue_depth {
        return Ok(Decision::Deny(DenyReason::TargetQueueFull {
            depth,
            max: limits.max_target_queue_depth,
        }));
    }

    let count = count_identifiers_in_queue(store, identifier, queue).await?;
    if count >= limits.max_jobs_per_identifier {
        return Ok(Decision::Deny(DenyReason::IdentifierQuotaExceeded {
            count,
            max: limits.max_jobs_per_identifier,
        }));
    }

    Ok(Decision::Admit)
}
