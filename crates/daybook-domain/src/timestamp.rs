//! Normalized creation instants.
//!
//! The backing store historically wrote timestamps in two shapes: an epoch
//! milliseconds number or an RFC 3339 string. Everything past the ingestion
//! boundary sees a single [`Timestamp`] type; the representation branching
//! lives here and nowhere else.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_millis(ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms).map(Self)
    }

    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// The calendar day this instant falls on, in the local time zone.
    /// Streaks and weekday counts are anchored to local days.
    pub fn local_day(&self) -> NaiveDate {
        self.0.with_timezone(&Local).date_naive()
    }

    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

/// The shapes a stored timestamp may arrive in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn normalize(self) -> Option<Timestamp> {
        match self {
            RawTimestamp::Millis(ms) => Timestamp::from_millis(ms),
            RawTimestamp::Text(s) => Timestamp::parse(&s),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTimestamp::deserialize(deserializer)?;
        raw.normalize()
            .ok_or_else(|| serde::de::Error::custom("unrepresentable timestamp"))
    }
}

/// Field-level deserializer for optional timestamps: absent, malformed or
/// out-of-range values all become `None` instead of failing the record.
pub fn lenient_option<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::Number(n) => n.as_i64().and_then(Timestamp::from_millis),
        serde_json::Value::String(s) => Timestamp::parse(&s),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "lenient_option")]
        created_at: Option<Timestamp>,
    }

    #[test]
    fn accepts_epoch_millis() {
        let r: Record = serde_json::from_str(r#"{"created_at": 1756300000000}"#).unwrap();
        assert_eq!(r.created_at.unwrap().millis(), 1_756_300_000_000);
    }

    #[test]
    fn accepts_rfc3339_text() {
        let r: Record = serde_json::from_str(r#"{"created_at": "2026-08-28T10:00:00Z"}"#).unwrap();
        assert!(r.created_at.is_some());
    }

    #[test]
    fn malformed_becomes_none() {
        let r: Record = serde_json::from_str(r#"{"created_at": "yesterday-ish"}"#).unwrap();
        assert!(r.created_at.is_none());

        let r: Record = serde_json::from_str(r#"{"created_at": null}"#).unwrap();
        assert!(r.created_at.is_none());

        let r: Record = serde_json::from_str(r#"{}"#).unwrap();
        assert!(r.created_at.is_none());
    }

    #[test]
    fn serializes_as_rfc3339() {
        let ts = Timestamp::from_millis(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("1970-01-01"));
    }

    #[test]
    fn round_trips_through_text() {
        let ts = Timestamp::now();
        let back = Timestamp::parse(&ts.to_rfc3339()).unwrap();
        assert_eq!(back.millis(), ts.millis());
    }
}
