//! Resolution of the next candidate job for a waitlist.

use crate::core::{BouncerError, Job, JobStore, Waitlist};

/// The oldest job of a waitlist, loaded and with its next hop known.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The record as currently stored. Never mutated before the move succeeds.
    pub job: Job,
    /// Queue the job would move into.
    pub target_queue: String,
}

impl Candidate {
    /// Job identifier.
    pub fn job_id(&self) -> &str {
        self.job.job_id()
    }
}

/// Resolve the oldest entry of `waitlist`.
///
/// Returns `Ok(None)` for an empty waitlist. A dangling id, an unparseable
/// record or an empty routing stack come back as recoverable errors and the
/// entry is left in place.
pub async fn next_candidate<S>(
    store: &S,
    waitlist: &Waitlist,
) -> Result<Option<Candidate>, BouncerError>
where
    S: JobStore + ?Sized,
{
    let Some(job_id) = store.list_tail(&waitlist.key).await? else {
        return Ok(None);
    };

    let job = store.fetch_job(&job_id).await?;
    let target_queue = job.next_hop()?.to_owned();

    Ok(Some(Candidate { job, target_queue }))
}
