//! Waitlist discovery.

use crate::core::{BouncerError, JobStore};

/// Separator between the waitlist prefix and the submitter identifier.
pub const KEY_SEPARATOR: char = ':';

/// A waitlist key together with the submitter it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waitlist {
    /// Full store key.
    pub key: String,
    /// Submitter identifier (account or network address).
    pub identifier: String,
}

impl Waitlist {
    /// Build a waitlist from its store key.
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let identifier = identifier_from_key(&key).to_owned();
        Self { key, identifier }
    }
}

/// The part of `key` after its last separator, or the whole key if it has none.
pub fn identifier_from_key(key: &str) -> &str {
    key.rsplit(KEY_SEPARATOR).next().unwrap_or(key)
}

/// Enumerate the waitlists currently present under `prefix`.
///
/// The result is a snapshot; lists may appear or drain while it is being
/// processed.
pub async fn scan_waitlists<S>(store: &S, prefix: &str) -> Result<Vec<Waitlist>, BouncerError>
where
    S: JobStore + ?Sized,
{
    let keys = store.keys_with_prefix(prefix).await?;
    tracing::trace!("found {} waitlists under {prefix}", keys.len());
    Ok(keys.into_iter().map(Waitlist::from_key).collect())
}
