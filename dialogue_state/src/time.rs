//! Wall-clock timestamps with millisecond resolution.
//!
//! Every timestamp is truncated to whole milliseconds when it is created and
//! written as RFC 3339 with three fractional digits, so a value survives a
//! serialize/deserialize cycle unchanged. Values without an offset, such as
//! `2024-05-01T12:00:00.123456`, are read as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

/// Point in time used for lines, sessions and context blocks.
pub type Timestamp = DateTime<Utc>;

/// Current time, truncated to milliseconds.
pub fn now() -> Timestamp {
    truncate(Utc::now())
}

/// Drop sub-millisecond precision.
pub fn truncate(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(3)
}

/// Build a timestamp from milliseconds since the Unix epoch.
pub fn from_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis)
}

/// Format as RFC 3339, e.g. `2024-05-01T12:00:00.123Z`.
pub fn format(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 value, normalized to UTC and milliseconds.
///
/// RFC 3339 values keep their offset; naive values are taken as UTC.
pub fn parse(value: &str) -> Result<Timestamp, chrono::ParseError> {
    let ts = match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(err) => NaiveDateTime::parse_from_str(value, NAIVE_FORMAT)
            .map_err(|_| err)?
            .and_utc(),
    };
    Ok(truncate(ts))
}

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Serde adapter for `Timestamp` fields.
pub mod iso_millis {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Timestamp;

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Timestamp>` fields; `None` is written as `null`.
pub mod iso_millis_option {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Timestamp;

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_some(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
