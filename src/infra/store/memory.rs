//! In-memory store with Redis list semantics.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{BouncerError, Job, JobStore};

#[derive(Default)]
struct State {
    /// Front is the head (index 0), back is the tail (index -1).
    lists: BTreeMap<String, VecDeque<String>>,
    /// Job records keyed by job id.
    records: HashMap<String, HashMap<String, String>>,
}

/// Process-local store for development and testing.
///
/// Clones share state. Lists that become empty are removed, so they stop
/// showing up in key scans just like in Redis.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `entry` to the head of the list at `key`.
    pub fn push_head(&self, key: &str, entry: &str) {
        self.state
            .lock()
            .lists
            .entry(key.to_owned())
            .or_default()
            .push_front(entry.to_owned());
    }

    /// Store a complete job record, replacing any previous one.
    pub fn insert_job(&self, job: &Job) {
        let fields = job
            .to_fields()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        self.insert_raw_job(job.job_id(), fields);
    }

    /// Store raw record fields without any validation.
    pub fn insert_raw_job(&self, job_id: &str, fields: HashMap<String, String>) {
        self.state.lock().records.insert(job_id.to_owned(), fields);
    }

    /// Raw record fields, if the job exists.
    pub fn raw_job(&self, job_id: &str) -> Option<HashMap<String, String>> {
        self.state.lock().records.get(job_id).cloned()
    }

    /// Snapshot of a list, head first.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.state
            .lock()
            .lists
            .get(key)
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, BouncerError> {
        Ok(self
            .state
            .lock()
            .lists
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn list_tail(&self, key: &str) -> Result<Option<String>, BouncerError> {
        Ok(self
            .state
            .lock()
            .lists
            .get(key)
            .and_then(|l| l.back().cloned()))
    }

    async fn list_len(&self, key: &str) -> Result<usize, BouncerError> {
        Ok(self.state.lock().lists.get(key).map_or(0, VecDeque::len))
    }

    async fn list_entries(&self, key: &str) -> Result<Vec<String>, BouncerError> {
        Ok(self.list(key))
    }

    async fn move_tail_to_head(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<String>, BouncerError> {
        let mut state = self.state.lock();
        let Some(list) = state.lists.get_mut(source) else {
            return Ok(None);
        };
        let moved = list.pop_back();
        if list.is_empty() {
            state.lists.remove(source);
        }
        if let Some(entry) = &moved {
            state
                .lists
                .entry(destination.to_owned())
                .or_default()
                .push_front(entry.clone());
        }
        Ok(moved)
    }

    async fn fetch_job(&self, job_id: &str) -> Result<Job, BouncerError> {
        let fields = self.raw_job(job_id).unwrap_or_default();
        Job::from_fields(job_id, &fields)
    }

    async fn commit_job(&self, job: &Job) -> Result<(), BouncerError> {
        let mut state = self.state.lock();
        let record = state.records.entry(job.job_id().to_owned()).or_default();
        for (field, value) in job.mutable_fields() {
            record.insert(field.to_owned(), value);
        }
        Ok(())
    }
}
