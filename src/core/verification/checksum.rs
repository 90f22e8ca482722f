//! Checksum calculation for transfer verification
//!
//! A payload is serialized to JSON, every object's keys are sorted at every
//! depth, and the compact serialization is hashed with SHA-256. Dates and
//! decimals are rendered by the [`canonical`] serializers so the same record
//! always produces the same bytes.

use crate::domain::errors::CareLinkError;
use crate::domain::transfer::Checksum;
use crate::domain::Result;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Calculate the SHA-256 checksum of a serializable payload
///
/// Insensitive to the order in which mapping keys were inserted.
///
/// # Examples
///
/// ```
/// use carelink::core::verification::checksum::calculate_checksum;
/// use serde_json::json;
///
/// let a = calculate_checksum(&json!({"a": 1, "b": 2})).unwrap();
/// let b = calculate_checksum(&json!({"b": 2, "a": 1})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
pub fn calculate_checksum<T: Serialize + ?Sized>(payload: &T) -> Result<Checksum> {
    let value = serde_json::to_value(payload)
        .map_err(|e| CareLinkError::Serialization(e.to_string()))?;
    let canonical = canonical_json(&value)?;
    Checksum::new(calculate_checksum_bytes(canonical.as_bytes()))
        .map_err(CareLinkError::Serialization)
}

/// Compact JSON with keys sorted at every depth
pub fn canonical_json(value: &Value) -> Result<String> {
    serde_json::to_string(&normalize_json(value))
        .map_err(|e| CareLinkError::Serialization(e.to_string()))
}

fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(normalize_json).collect()),
        _ => value.clone(),
    }
}

/// Hex-encoded SHA-256 of raw bytes
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Serde helpers that render values in their canonical hashed form
///
/// Use with `#[serde(serialize_with = "...")]` on payload fields.
pub mod canonical {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use rust_decimal::Decimal;
    use serde::Serializer;

    /// RFC 3339, UTC, microsecond precision
    pub fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Trailing zeros stripped, so `12.50` and `12.5` hash alike
    pub fn format_decimal(value: &Decimal) -> String {
        value.normalize().to_string()
    }

    pub fn timestamp<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(at))
    }

    pub fn opt_timestamp<S: Serializer>(
        at: &Option<DateTime<Utc>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match at {
            Some(at) => timestamp(at, s),
            None => s.serialize_none(),
        }
    }

    pub fn opt_date<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn opt_decimal<S: Serializer>(value: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => s.serialize_str(&format_decimal(value)),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_calculate_checksum_deterministic() {
        let data = json!({
            "patient": {"name": "Ada", "email": "ada@example.org"},
            "treatment_history": [{"session_id": "s-1", "profit": "12.5"}]
        });

        let first = calculate_checksum(&data).unwrap();
        let second = calculate_checksum(&data).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
    }

    #[test]
    fn test_calculate_checksum_key_order_independence() {
        let mut forward = serde_json::Map::new();
        forward.insert("a".into(), json!(1));
        forward.insert("b".into(), json!({"y": 2, "x": 3}));

        let mut backward = serde_json::Map::new();
        backward.insert("b".into(), json!({"x": 3, "y": 2}));
        backward.insert("a".into(), json!(1));

        assert_eq!(
            calculate_checksum(&Value::Object(forward)).unwrap(),
            calculate_checksum(&Value::Object(backward)).unwrap()
        );
    }

    #[test]
    fn test_calculate_checksum_different_content() {
        let before = json!({"notes": "stable"});
        let after = json!({"notes": "stable."});

        assert_ne!(
            calculate_checksum(&before).unwrap(),
            calculate_checksum(&after).unwrap()
        );
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = json!({"history": [1, 2]});
        let b = json!({"history": [2, 1]});
        assert_ne!(calculate_checksum(&a).unwrap(), calculate_checksum(&b).unwrap());
    }

    #[test]
    fn test_canonical_json_is_compact_and_sorted() {
        let data = json!({"z": {"b": 1, "a": null}, "a": [true]});
        assert_eq!(
            canonical_json(&data).unwrap(),
            r#"{"a":[true],"z":{"a":null,"b":1}}"#
        );
    }

    #[test]
    fn test_calculate_checksum_known_value() {
        // sha256 of the empty string
        assert_eq!(
            calculate_checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_timestamp_has_micros_and_z() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(
            canonical::format_timestamp(&at),
            "2024-03-01T08:30:00.000000Z"
        );
    }

    #[test]
    fn test_canonical_decimal_strips_trailing_zeros() {
        let a = Decimal::from_str("12.50").unwrap();
        let b = Decimal::from_str("12.5").unwrap();
        assert_eq!(canonical::format_decimal(&a), "12.5");
        assert_eq!(canonical::format_decimal(&a), canonical::format_decimal(&b));
    }
}
