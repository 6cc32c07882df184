//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for event times and photo modification times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render `ts` as an ISO-8601 stamp that is safe inside a file name.
///
/// `2024-10-31T21:04:05.123Z` becomes `2024-10-31T21-04-05.123Z`. Only
/// millisecond resolution is kept, so two calls within the same
/// millisecond produce the same stamp.
#[must_use]
pub fn file_stamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-")
}
