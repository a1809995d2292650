//! Core admission abstractions: job model, store gateway, guards and the controller loop.

pub mod admission;
pub mod audit;
pub mod controller;
pub mod error;
pub mod job;
pub mod mover;
pub mod resolver;
pub mod scanner;
pub mod store;

pub use admission::{count_identifiers_in_queue, evaluate, AdmissionLimits, Decision, DenyReason};
pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use controller::{Bouncer, TickReport, WaitlistOutcome};
pub use error::{AppResult, BouncerError};
pub use job::{Job, JOB_KEY_PREFIX, LIST_SEPARATOR};
pub use mover::{move_job, MoveOutcome};
pub use resolver::{next_candidate, Candidate};
pub use scanner::{identifier_from_key, scan_waitlists, Waitlist, KEY_SEPARATOR};
pub use store::JobStore;
