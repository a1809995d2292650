//! The bouncer: one scan-evaluate-move pass per tick, forever.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::BouncerConfig;
use crate::core::{
    build_audit_event, evaluate, move_job, next_candidate, scan_waitlists, AdmissionLimits,
    AuditSink, BouncerError, Decision, DenyReason, JobStore, MoveOutcome, Waitlist,
};
use crate::util::clock::now_utc;

/// What happened to a single waitlist during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitlistOutcome {
    /// The waitlist had no entries.
    Empty,
    /// The oldest entry could not be resolved; it stays queued.
    Skipped {
        /// Why resolution failed.
        reason: String,
    },
    /// A guard refused the move.
    Denied {
        /// Job that was held back.
        job_id: String,
        /// Queue it was headed for.
        queue: String,
        /// Guard that refused.
        reason: DenyReason,
    },
    /// The job moved and its record was committed.
    Admitted {
        /// Job that moved.
        job_id: String,
        /// Queue it moved into.
        queue: String,
    },
    /// The job moved but its record could not be committed.
    PartialCommit {
        /// Job that moved.
        job_id: String,
        /// Queue it moved into.
        queue: String,
    },
    /// The waitlist changed under us between resolution and transfer.
    Raced {
        /// Entry the transfer actually carried, if any.
        moved: Option<String>,
    },
}

/// Summary of one pass over all waitlists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Waitlists found by the scan.
    pub scanned: usize,
    /// Waitlists with no entries.
    pub empty: usize,
    /// Waitlists whose oldest entry could not be resolved.
    pub skipped: usize,
    /// Waitlists held back by a guard.
    pub denied: usize,
    /// Jobs moved into a target queue.
    pub admitted: usize,
    /// Jobs moved whose record commit failed.
    pub partial_commits: usize,
    /// Transfers that raced with another writer.
    pub raced: usize,
}

impl TickReport {
    fn tally(&mut self, outcome: &WaitlistOutcome) {
        match outcome {
            WaitlistOutcome::Empty => self.empty += 1,
            WaitlistOutcome::Skipped { .. } => self.skipped += 1,
            WaitlistOutcome::Denied { .. } => self.denied += 1,
            WaitlistOutcome::Admitted { .. } => self.admitted += 1,
            WaitlistOutcome::PartialCommit { .. } => self.partial_commits += 1,
            WaitlistOutcome::Raced { .. } => self.raced += 1,
        }
    }

    /// True when the pass changed anything in the store.
    pub const fn moved_anything(&self) -> bool {
        self.admitted + self.partial_commits + self.raced > 0
    }
}

/// Periodic admission controller over a [`JobStore`].
pub struct Bouncer<S> {
    config: BouncerConfig,
    limits: AdmissionLimits,
    store: S,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S> Bouncer<S>
where
    S: JobStore,
{
    /// Create a bouncer. `config` is expected to be validated already.
    pub fn new(config: BouncerConfig, store: S) -> Self {
        let limits = AdmissionLimits::from(&config);
        Self {
            config,
            limits,
            store,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Active configuration.
    pub const fn config(&self) -> &BouncerConfig {
        &self.config
    }

    /// Underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run passes until `shutdown` is cancelled.
    ///
    /// Passes never overlap: the interval sleep only starts once a pass has
    /// finished, and cancellation is only observed while sleeping. A store
    /// failure ends the loop with an error.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), BouncerError> {
        let interval = self.config.poll_interval();
        tracing::info!(
            controller = %self.config.controller_name,
            prefix = %self.config.waitlist_prefix,
            max_jobs = self.limits.max_jobs_per_identifier,
            max_depth = self.limits.max_target_queue_depth,
            "bouncer started, polling every {}s",
            interval.as_secs()
        );

        loop {
            let report = self.process_waitlists().await?;
            if report.moved_anything() || report.skipped > 0 {
                tracing::info!(?report, "pass finished");
            } else {
                tracing::debug!(?report, "pass finished");
            }

            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("bouncer stopping");
                    return Ok(());
                }
                () = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// Perform one pass over every waitlist currently in the store.
    pub async fn process_waitlists(&self) -> Result<TickReport, BouncerError> {
        let waitlists = scan_waitlists(&self.store, &self.config.waitlist_prefix).await?;
        let mut report = TickReport {
            scanned: waitlists.len(),
            ..TickReport::default()
        };

        for waitlist in &waitlists {
            let outcome = self.process_waitlist(waitlist).await?;
            report.tally(&outcome);
        }
        Ok(report)
    }

    /// Resolve, evaluate and possibly move the oldest job of one waitlist.
    pub async fn process_waitlist(
        &self,
        waitlist: &Waitlist,
    ) -> Result<WaitlistOutcome, BouncerError> {
        let candidate = match next_candidate(&self.store, waitlist).await {
            Ok(Some(candidate)) => candidate,
            Ok(None) => return Ok(WaitlistOutcome::Empty),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(waitlist = %waitlist.key, "skipping waitlist: {err}");
                self.record(
                    waitlist,
                    &unresolved_job_id(&err),
                    None,
                    "skip",
                    Some(err.to_string()),
                );
                return Ok(WaitlistOutcome::Skipped {
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        let job_id = candidate.job_id().to_owned();
        let queue = candidate.target_queue.clone();

        let decision = evaluate(&self.store, self.limits, &waitlist.identifier, &queue).await?;
        if let Decision::Deny(reason) = decision {
            tracing::debug!(
                waitlist = %waitlist.key,
                job = %job_id,
                queue = %queue,
                "denied: {reason}"
            );
            self.record(
                waitlist,
                &job_id,
                Some(queue.as_str()),
                "deny",
                Some(reason.to_string()),
            );
            return Ok(WaitlistOutcome::Denied {
                job_id,
                queue,
                reason,
            });
        }

        match move_job(
            &self.store,
            &waitlist.key,
            candidate,
            &self.config.controller_name,
            now_utc(),
        )
        .await
        {
            Ok(MoveOutcome::Moved(_)) => {
                tracing::debug!(
                    waitlist = %waitlist.key,
                    job = %job_id,
                    queue = %queue,
                    "admitted"
                );
                self.record(waitlist, &job_id, Some(queue.as_str()), "admit", None);
                Ok(WaitlistOutcome::Admitted { job_id, queue })
            }
            Ok(MoveOutcome::Raced { moved }) => {
                tracing::warn!(
                    waitlist = %waitlist.key,
                    expected = %job_id,
                    moved = ?moved,
                    "waitlist changed during move; record left untouched"
                );
                Ok(WaitlistOutcome::Raced { moved })
            }
            Err(err @ BouncerError::PartialCommit { .. }) => {
                tracing::error!(waitlist = %waitlist.key, "{err}");
                self.record(
                    waitlist,
                    &job_id,
                    Some(queue.as_str()),
                    "partial-commit",
                    Some(err.to_string()),
                );
                Ok(WaitlistOutcome::PartialCommit { job_id, queue })
            }
            Err(err) => Err(err),
        }
    }

    fn record(
        &self,
        waitlist: &Waitlist,
        job_id: &str,
        queue: Option<&str>,
        action: &str,
        detail: Option<String>,
    ) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            sink.record(build_audit_event(
                job_id,
                waitlist.key.as_str(),
                queue.map(str::to_owned),
                waitlist.identifier.as_str(),
                action,
                detail,
            ));
        }
    }
}

fn unresolved_job_id(err: &BouncerError) -> String {
    match err {
        BouncerError::JobNotFound(id) | BouncerError::EmptyRoutingStack(id) => id.clone(),
        BouncerError::InvalidRecord { job_id, .. } => job_id.clone(),
        _ => String::new(),
    }
}
