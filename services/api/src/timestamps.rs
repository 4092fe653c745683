//! services/api/src/timestamps.rs
//!
//! Lenient reading of the date-time fields that browsers and the backend send.
//! These fields are display data, so a value that cannot be read becomes `None`
//! instead of failing the whole payload.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Reads a local date-time (`2024-03-01T10:00:00`, fractions allowed), an RFC 3339
/// timestamp with an offset or `Z`, or a bare `YYYY-MM-DD` date at midnight.
///
/// Offset timestamps keep their wall-clock time; the offset is dropped.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(local) = raw.parse::<NaiveDateTime>() {
        return Some(local);
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Other(IgnoredAny),
}

/// `deserialize_with` helper for optional timestamp fields. Pair it with
/// `#[serde(default)]` so a missing field also reads as `None`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => None,
        Some(RawTimestamp::Text(text)) => {
            let parsed = parse_timestamp(&text);
            if parsed.is_none() {
                warn!("Ignoring unreadable timestamp '{}'", text);
            }
            parsed
        }
        Some(RawTimestamp::Other(_)) => {
            warn!("Ignoring a timestamp that is not a string");
            None
        }
    };
    Ok(parsed)
}
