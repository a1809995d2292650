//! Redis-backed store gateway.
//!
//! Waitlists and target queues are plain Redis lists, job records are hashes
//! under `job:<id>`. The move uses `RPOPLPUSH`, which Redis executes
//! atomically.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind, RedisError};

use crate::core::{BouncerError, Job, JobStore};

/// Store gateway speaking to a Redis server.
///
/// The connection manager reconnects on its own; each call clones the cheap
/// handle.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the server at `uri` (e.g. `redis://localhost:6379/0`).
    pub async fn connect(uri: &str) -> Result<Self, BouncerError> {
        let client = redis::Client::open(uri).map_err(store_error)?;
        let conn = ConnectionManager::new(client).await.map_err(store_error)?;
        tracing::info!("connected to store at {uri}");
        Ok(Self { conn })
    }
}

fn store_error(err: RedisError) -> BouncerError {
    BouncerError::StoreUnavailable(err.to_string())
}

/// A job key holding something other than a decodable hash is a bad record,
/// not a store outage. Redis answers `WRONGTYPE` when the key is not a hash.
fn is_bad_record(kind: ErrorKind, code: Option<&str>) -> bool {
    kind == ErrorKind::TypeError || code == Some("WRONGTYPE")
}

fn fetch_error(job_id: &str, err: RedisError) -> BouncerError {
    if is_bad_record(err.kind(), err.code()) {
        BouncerError::InvalidRecord {
            job_id: job_id.to_owned(),
            reason: err.to_string(),
        }
    } else {
        store_error(err)
    }
}

#[async_trait]
impl JobStore for RedisStore {
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, BouncerError> {
        let mut conn = self.conn.clone();
        conn.keys(format!("{prefix}*")).await.map_err(store_error)
    }

    async fn list_tail(&self, key: &str) -> Result<Option<String>, BouncerError> {
        let mut conn = self.conn.clone();
        conn.lindex(key, -1).await.map_err(store_error)
    }

    async fn list_len(&self, key: &str) -> Result<usize, BouncerError> {
        let mut conn = self.conn.clone();
        conn.llen(key).await.map_err(store_error)
    }

    async fn list_entries(&self, key: &str) -> Result<Vec<String>, BouncerError> {
        let mut conn = self.conn.clone();
        conn.lrange(key, 0, -1).await.map_err(store_error)
    }

    async fn move_tail_to_head(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<String>, BouncerError> {
        let mut conn = self.conn.clone();
        conn.rpoplpush(source, destination)
            .await
            .map_err(store_error)
    }

    async fn fetch_job(&self, job_id: &str) -> Result<Job, BouncerError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(Job::key_for(job_id))
            .await
            .map_err(|err| fetch_error(job_id, err))?;
        Job::from_fields(job_id, &fields)
    }

    async fn commit_job(&self, job: &Job) -> Result<(), BouncerError> {
        let mut conn = self.conn.clone();
        let fields = job.mutable_fields();
        let _: () = conn
            .hset_multiple(job.key(), &fields)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
