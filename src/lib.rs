//! # Waitlist Bouncer
//!
//! A periodic admission controller that lets queued jobs out of per-submitter
//! waitlists into shared processing queues.
//!
//! Every submitter (an account identifier or a network address) gets its own
//! waitlist. On each tick the bouncer looks at the oldest job of every
//! waitlist and moves it into the queue named by the job's routing stack,
//! but only while two guards agree:
//!
//! - **Target depth**: the target queue is not deeper than its ceiling.
//! - **Per-identifier occupancy**: the submitter has fewer jobs in the target
//!   queue than its ceiling.
//!
//! Nobody can monopolise the downstream workers, yet throttled jobs get in as
//! soon as capacity frees up.
//!
//! ## Store layout
//!
//! - Waitlist: list at `<prefix><identifier>`, oldest job id at the tail.
//! - Target queue: list named by the job, entries pushed at the head.
//! - Job record: hash at `job:<id>`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use waitlist_bouncer::builders::BouncerBuilder;
//! use waitlist_bouncer::config::BouncerConfig;
//! use waitlist_bouncer::runtime::install_shutdown_handler;
//!
//! let bouncer = BouncerBuilder::new(BouncerConfig::default()).connect().await?;
//! bouncer.run(install_shutdown_handler()).await?;
//! ```
//!
//! For a single pass, e.g. from a test against [`infra::InMemoryStore`]:
//!
//! ```rust,ignore
//! let report = bouncer.process_waitlists().await?;
//! println!("moved {} jobs", report.admitted);
//! ```
//!
//! ## Consistency
//!
//! Only the transfer itself is atomic. The occupancy read and the move are
//! separate steps, so concurrent writers (or a second bouncer) can push a
//! submitter past its ceiling for a while. If the record commit fails after a
//! successful transfer the job is in its queue with a stale trace; this is
//! logged and left for reconciliation.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Job model, store gateway, admission guards and the controller loop.
pub mod core;
/// Configuration models.
pub mod config;
/// Builders to construct a bouncer from configuration.
pub mod builders;
/// Store backends.
pub mod infra;
/// Runtime integration (signal handling).
pub mod runtime;
/// Shared utilities.
pub mod util;
