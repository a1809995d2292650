//! Job records as seen by the bouncer.
//!
//! Jobs are owned by the submission side and stored as flat string hashes
//! under `job:<id>`. The bouncer only reads the identifier fields and the
//! routing stack, and only ever writes the routing stack, the trace and the
//! last-changed timestamp.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, Utc};

use crate::core::BouncerError;

/// Key prefix under which job records are stored.
pub const JOB_KEY_PREFIX: &str = "job:";

/// Separator used for list-valued record fields.
pub const LIST_SEPARATOR: char = ',';

/// Timestamp layout written to job records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Fractional-second digits kept by [`TIMESTAMP_FORMAT`].
pub const TIMESTAMP_PRECISION: u16 = 6;

const FIELD_EMAIL: &str = "email";
const FIELD_IP_ADDR: &str = "ip_addr";
const FIELD_TARGET_QUEUES: &str = "target_queues";
const FIELD_TRACE: &str = "trace";
const FIELD_ADDED: &str = "added";
const FIELD_LAST_CHANGED: &str = "last_changed";

/// A queued unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    job_id: String,
    /// Account identifier of the submitter.
    pub email: Option<String>,
    /// Network address the job was submitted from.
    pub ip_addr: Option<String>,
    /// Remaining destinations; the last entry is the next hop.
    pub target_queues: Vec<String>,
    /// Names of the controllers that have handled this job, oldest first.
    pub trace: Vec<String>,
    /// Submission time.
    pub added: Option<DateTime<Utc>>,
    /// Time of the last state change.
    pub last_changed: Option<DateTime<Utc>>,
}

impl Job {
    /// Create an empty job record with the given id.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            email: None,
            ip_addr: None,
            target_queues: Vec::new(),
            trace: Vec::new(),
            added: None,
            last_changed: None,
        }
    }

    /// Unique job identifier.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Store key holding the record for `job_id`.
    pub fn key_for(job_id: &str) -> String {
        format!("{JOB_KEY_PREFIX}{job_id}")
    }

    /// Store key holding this record.
    pub fn key(&self) -> String {
        Self::key_for(&self.job_id)
    }

    /// True when either the account identifier or the network address equals `identifier`.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.email.as_deref() == Some(identifier) || self.ip_addr.as_deref() == Some(identifier)
    }

    /// Peek at the next hop without consuming it.
    pub fn next_hop(&self) -> Result<&str, BouncerError> {
        self.target_queues
            .last()
            .map(String::as_str)
            .ok_or_else(|| BouncerError::EmptyRoutingStack(self.job_id.clone()))
    }

    /// Produce the record as it must look after being admitted by `controller` at `now`.
    ///
    /// Pops the next hop, appends the controller to the trace and moves
    /// `last_changed` forward. The timestamp is kept strictly increasing at
    /// stored precision, even if the local clock lags behind whoever wrote
    /// the previous value.
    pub fn admitted_by(mut self, controller: &str, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(TIMESTAMP_PRECISION);
        self.target_queues.pop();
        self.trace.push(controller.to_owned());
        self.last_changed = Some(match self.last_changed {
            Some(previous) if previous.trunc_subsecs(TIMESTAMP_PRECISION) >= now => {
                previous.trunc_subsecs(TIMESTAMP_PRECISION) + Duration::microseconds(1)
            }
            _ => now,
        });
        self
    }

    /// Decode a record from its stored field map.
    ///
    /// An empty map means the key does not exist.
    pub fn from_fields(
        job_id: impl Into<String>,
        fields: &HashMap<String, String>,
    ) -> Result<Self, BouncerError> {
        let job_id = job_id.into();
        if fields.is_empty() {
            return Err(BouncerError::JobNotFound(job_id));
        }

        let added = parse_optional_timestamp(&job_id, FIELD_ADDED, fields)?;
        let last_changed = parse_optional_timestamp(&job_id, FIELD_LAST_CHANGED, fields)?;

        Ok(Self {
            email: non_empty(fields.get(FIELD_EMAIL)),
            ip_addr: non_empty(fields.get(FIELD_IP_ADDR)),
            target_queues: split_list(fields.get(FIELD_TARGET_QUEUES)),
            trace: split_list(fields.get(FIELD_TRACE)),
            added,
            last_changed,
            job_id,
        })
    }

    /// Encode every known field.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(6);
        if let Some(email) = &self.email {
            fields.push((FIELD_EMAIL, email.clone()));
        }
        if let Some(ip_addr) = &self.ip_addr {
            fields.push((FIELD_IP_ADDR, ip_addr.clone()));
        }
        if let Some(added) = self.added {
            fields.push((FIELD_ADDED, format_timestamp(added)));
        }
        fields.extend(self.mutable_fields());
        fields
    }

    /// Encode only the fields the bouncer is allowed to change.
    pub fn mutable_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (FIELD_TARGET_QUEUES, join_list(&self.target_queues)),
            (FIELD_TRACE, join_list(&self.trace)),
        ];
        if let Some(last_changed) = self.last_changed {
            fields.push((FIELD_LAST_CHANGED, format_timestamp(last_changed)));
        }
        fields
    }
}

/// Render a timestamp in the stored layout.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp, accepting RFC 3339 and naive UTC layouts.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}

fn parse_optional_timestamp(
    job_id: &str,
    field: &str,
    fields: &HashMap<String, String>,
) -> Result<Option<DateTime<Utc>>, BouncerError> {
    match fields.get(field).map(String::as_str) {
        None | Some("") => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| BouncerError::InvalidRecord {
                job_id: job_id.to_owned(),
                reason: format!("unparseable {field} timestamp {raw:?}"),
            }),
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

fn split_list(value: Option<&String>) -> Vec<String> {
    match value {
        Some(raw) if !raw.is_empty() => raw.split(LIST_SEPARATOR).map(str::to_owned).collect(),
        _ => Vec::new(),
    }
}

fn join_list(items: &[String]) -> String {
    items.join(&LIST_SEPARATOR.to_string())
}
