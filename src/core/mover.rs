//! Moving an admitted job into its target queue.

use chrono::{DateTime, Utc};

use crate::core::{BouncerError, Candidate, Job, JobStore};

/// Result of attempting a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The job is in its target queue and its record was committed.
    Moved(Job),
    /// The waitlist changed between resolution and transfer.
    ///
    /// `moved` is whatever the atomic transfer actually carried over, if
    /// anything. No record is written in this case.
    Raced {
        /// Entry that was transferred instead of the candidate.
        moved: Option<String>,
    },
}

/// Transfer `candidate` from `waitlist_key` to its target queue and stamp it.
///
/// The routing stack, trace and timestamp are only changed after the store
/// has moved the id. A failed transfer therefore leaves the stored record
/// untouched. A failed commit after a successful transfer is reported as
/// [`BouncerError::PartialCommit`]; the job stays in the target queue.
pub async fn move_job<S>(
    store: &S,
    waitlist_key: &str,
    candidate: Candidate,
    controller_name: &str,
    now: DateTime<Utc>,
) -> Result<MoveOutcome, BouncerError>
where
    S: JobStore + ?Sized,
{
    let Candidate { job, target_queue } = candidate;

    let moved = store.move_tail_to_head(waitlist_key, &target_queue).await?;
    if moved.as_deref() != Some(job.job_id()) {
        return Ok(MoveOutcome::Raced { moved });
    }

    let job = job.admitted_by(controller_name, now);
    if let Err(err) = store.commit_job(&job).await {
        return Err(BouncerError::PartialCommit {
            job_id: job.job_id().to_owned(),
            queue: target_queue,
            source: Box::new(err),
        });
    }

    Ok(MoveOutcome::Moved(job))
}
