//! RFC 3339 timestamp helpers shared by snapshot records and git summaries.
//!
//! Timestamps are stored in UTC with millisecond precision
//! (`2024-05-01T10:00:00.000Z`). Parsing accepts any RFC 3339 offset so that
//! snapshots written by other tools still load.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Convert a filesystem time to a UTC timestamp truncated to whole milliseconds.
#[must_use]
pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
    let utc = DateTime::<Utc>::from(time);
    DateTime::from_timestamp_millis(utc.timestamp_millis()).unwrap_or(utc)
}

/// Convert seconds since the Unix epoch to a UTC timestamp.
#[must_use]
pub fn from_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

#[must_use]
pub fn format(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[must_use]
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// Serde adapter for `Option<DateTime<Utc>>` fields.
///
/// Unparseable strings deserialize to `None` instead of failing the record.
pub mod optional {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    #[allow(clippy::ref_option)] // serde `with` adapters receive `&Option<T>`
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_some(&super::format(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse))
    }
}
