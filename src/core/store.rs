//! Store gateway abstraction.

use async_trait::async_trait;

use crate::core::{BouncerError, Job};

/// Key-value store holding waitlists, target queues and job records.
///
/// Lists follow Redis conventions: index 0 is the head, index -1 the tail.
/// Producers push at the head, so the tail holds the oldest entry.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Point-in-time snapshot of all list keys starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, BouncerError>;

    /// Oldest entry of a list, `None` when the list is empty or missing.
    async fn list_tail(&self, key: &str) -> Result<Option<String>, BouncerError>;

    /// Current length of a list.
    async fn list_len(&self, key: &str) -> Result<usize, BouncerError>;

    /// All entries of a list, head first.
    async fn list_entries(&self, key: &str) -> Result<Vec<String>, BouncerError>;

    /// Atomically pop the tail of `source` and push it to the head of `destination`.
    ///
    /// Returns the moved entry, or `None` if `source` was empty.
    async fn move_tail_to_head(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<String>, BouncerError>;

    /// Load a job record.
    async fn fetch_job(&self, job_id: &str) -> Result<Job, BouncerError>;

    /// Persist the fields of `job` the bouncer is allowed to change.
    async fn commit_job(&self, job: &Job) -> Result<(), BouncerError>;
}
