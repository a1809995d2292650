//! Command-line entry point for the waitlist bouncer.

use clap::Parser;

use waitlist_bouncer::builders::BouncerBuilder;
use waitlist_bouncer::config::BouncerConfig;
use waitlist_bouncer::core::AppResult;
use waitlist_bouncer::runtime::install_shutdown_handler;
use waitlist_bouncer::util::telemetry::init_tracing;

/// Allow jobs from per-submitter waitlists into their target queues.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// URI of the store containing waitlists, queues and job records
    #[arg(
        long = "store-uri",
        visible_alias = "database",
        env = "BOUNCER_DB",
        default_value = "redis://localhost:6379/0",
    )]
    store_uri: String,

    /// Prefix of the waitlist keys
    #[arg(
        short = 'p',
        long = "waitlist-prefix",
        visible_alias = "prefix",
        env = "BOUNCER_WAITLIST_PREFIX",
        default_value = "jobs:waiting:",
    )]
    waitlist_prefix: String,

    /// Maximum jobs a waitlisted submitter can have in a target queue
    #[arg(
        short = 'm',
        long = "max-jobs-per-identifier",
        visible_alias = "max-jobs",
        env = "BOUNCER_MAXJOBS",
        default_value_t = 5,
    )]
    max_jobs_per_identifier: usize,

    /// Depth above which a target queue stops accepting jobs
    #[arg(
        short = 'd',
        long = "max-target-queue-depth",
        env = "BOUNCER_MAX_QUEUE_DEPTH",
        default_value_t = 50,
    )]
    max_target_queue_depth: usize,

    /// Check interval in seconds
    #[arg(
        short = 'i',
        long = "poll-interval-seconds",
        visible_alias = "interval",
        env = "BOUNCER_INTERVAL",
        default_value_t = 60,
    )]
    poll_interval_secs: u64,

    /// Name recorded in the trace of every moved job
    #[arg(
        short = 'n',
        long = "controller-name",
        visible_alias = "name",
        env = "BOUNCER_NAME",
        default_value = "bouncer",
    )]
    controller_name: String,
}

impl From<Args> for BouncerConfig {
    fn from(args: Args) -> Self {
        Self {
            store_uri: args.store_uri,
            waitlist_prefix: args.waitlist_prefix,
            max_jobs_per_identifier: args.max_jobs_per_identifier,
            max_target_queue_depth: args.max_target_queue_depth,
            poll_interval_secs: args.poll_interval_secs,
            controller_name: args.controller_name,
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = BouncerConfig::from(Args::parse());
    config.validate().map_err(anyhow::Error::msg)?;

    let bouncer = BouncerBuilder::new(config).connect().await?;
    let shutdown = install_shutdown_handler();
    bouncer.run(shutdown).await?;
    Ok(())
}
