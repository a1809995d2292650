//! Wall-clock helpers.

use chrono::{DateTime, Utc};

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn now_ms() -> u128 {
    u128::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
