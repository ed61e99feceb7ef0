//! Lenient field decoders shared by the wire records.
//!
//! The backend is loose about types: ids arrive as strings or numbers under
//! `id` or `_id`, counts sometimes arrive as numeric strings, and dates come
//! either as full timestamps or as plain `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::domain::end_of_day_utc;

/// Deserialize an optional id given as a string or an integer.
pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Deserialize an optional non-negative count.
///
/// Numbers and numeric strings are accepted; negatives become 0 and values
/// past `u32::MAX` saturate. Anything else reads as absent.
pub(crate) fn deserialize_opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.clamp(0, u32::MAX as i64) as u32))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.min(u32::MAX as u64) as u32))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if value.is_nan() {
                return Ok(None);
            }
            Ok(Some(value.clamp(0.0, u32::MAX as f64) as u32))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            let value = value.trim();
            if let Ok(n) = value.parse::<i64>() {
                return self.visit_i64(n);
            }
            match value.parse::<f64>() {
                Ok(n) => self.visit_f64(n),
                Err(_) => Ok(None),
            }
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// Item reference: an id (string or number) or an embedded item object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawItemRef {
    Embedded {
        #[serde(default, deserialize_with = "deserialize_opt_id")]
        id: Option<String>,
        #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
        mongo_id: Option<String>,
        #[serde(default)]
        descripcion: Option<String>,
    },
    Text(String),
    Number(i64),
}

impl RawItemRef {
    /// Split into `(id, embedded description)`.
    pub(crate) fn split(self) -> (String, Option<String>) {
        match self {
            RawItemRef::Text(id) => (id, None),
            RawItemRef::Number(n) => (n.to_string(), None),
            RawItemRef::Embedded {
                id,
                mongo_id,
                descripcion,
            } => (pick_id(id, mongo_id), descripcion.filter(|d| !d.is_empty())),
        }
    }
}

/// `id` wins over `_id`; a record with neither gets an empty id.
pub(crate) fn pick_id(id: Option<String>, mongo_id: Option<String>) -> String {
    id.filter(|s| !s.is_empty())
        .or(mongo_id)
        .unwrap_or_default()
}

/// Parse a backend timestamp.
///
/// A date without a time means the end of that day in UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(end_of_day_utc(date));
    }
    None
}

/// First ten characters of a date-like string (`YYYY-MM-DD`).
pub fn date_prefix(raw: &str) -> String {
    raw.trim().chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_opt_id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "deserialize_opt_count")]
        n: Option<u32>,
    }

    fn probe(v: serde_json::Value) -> Probe {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_ids() {
        assert_eq!(probe(json!({"id": "abc"})).id.as_deref(), Some("abc"));
        assert_eq!(probe(json!({"id": 42})).id.as_deref(), Some("42"));
        assert_eq!(probe(json!({"id": null})).id, None);
        assert_eq!(probe(json!({})).id, None);
    }

    #[test]
    fn test_counts() {
        assert_eq!(probe(json!({"n": 5})).n, Some(5));
        assert_eq!(probe(json!({"n": "7"})).n, Some(7));
        assert_eq!(probe(json!({"n": -3})).n, Some(0));
        assert_eq!(probe(json!({"n": 2.0})).n, Some(2));
        assert_eq!(probe(json!({"n": "x"})).n, None);
        assert_eq!(probe(json!({"n": null})).n, None);
        assert_eq!(probe(json!({})).n, None);
    }

    #[test]
    fn test_pick_id() {
        assert_eq!(pick_id(Some("1".into()), Some("a".into())), "1");
        assert_eq!(pick_id(None, Some("a".into())), "a");
        assert_eq!(pick_id(Some(String::new()), Some("a".into())), "a");
        assert_eq!(pick_id(None, None), "");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2025-12-31T23:59:59.000Z"),
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-12-31"),
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-01-02T03:04:05"),
            Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("mañana"), None);
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("2025-12-31T23:59:59.000Z"), "2025-12-31");
        assert_eq!(date_prefix(""), "");
    }
}
