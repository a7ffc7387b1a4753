//! Lenient deserializers for API payloads.
//!
//! The API is not consistent about numeric encodings: counters may arrive as
//! numbers, numeric strings or `null`. These helpers accept all three and
//! leave defaulting to the normalization step.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a number, a numeric string or null as `Option<u64>`.
pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept a number, a numeric string or null as `Option<f64>`.
pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept a string, number or bool as `Option<String>`; null stays `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept a list of numbers where entries may be numeric strings.
pub fn opt_f64_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<f64>>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|v| match v {
                    Value::Number(n) => n.as_f64().unwrap_or(0.0),
                    Value::String(s) => s.trim().parse().unwrap_or(0.0),
                    _ => 0.0,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Accept a list of scalars as strings; numbers are rendered as text.
pub fn opt_string_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => Some(items.iter().map(value_to_text).collect()),
        _ => None,
    })
}

/// Accept an object of numbers (or numeric strings) as a sorted map.
pub fn opt_f64_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<BTreeMap<String, f64>>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Object(map)) => Some(
            map.into_iter()
                .map(|(k, v)| (k, value_to_f64(&v).unwrap_or(0.0)))
                .collect(),
        ),
        _ => None,
    })
}

/// Numeric value of a number or numeric string.
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render any scalar JSON value as text, `""` for null and containers.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// `Some(s)` unless the string is empty.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_u64")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "opt_f64")]
        ratio: Option<f64>,
        #[serde(default, deserialize_with = "opt_string")]
        label: Option<String>,
        #[serde(default, deserialize_with = "opt_f64_vec")]
        series: Option<Vec<f64>>,
        #[serde(default, deserialize_with = "opt_string_vec")]
        bins: Option<Vec<String>>,
        #[serde(default, deserialize_with = "opt_f64_map")]
        histogram: Option<BTreeMap<String, f64>>,
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let p: Probe =
            serde_json::from_str(r#"{"count":"12","ratio":"0.5","label":42,"series":[1,"2.5",null]}"#)
                .unwrap();
        assert_eq!(p.count, Some(12));
        assert_eq!(p.ratio, Some(0.5));
        assert_eq!(p.label.as_deref(), Some("42"));
        assert_eq!(p.series, Some(vec![1.0, 2.5, 0.0]));
    }

    #[test]
    fn test_mixed_lists_and_maps() {
        let p: Probe =
            serde_json::from_str(r#"{"bins":["a",1.5,null],"histogram":{"x":"2","y":3,"z":null}}"#)
                .unwrap();
        assert_eq!(p.bins, Some(vec!["a".to_string(), "1.5".to_string(), String::new()]));
        let histogram = p.histogram.unwrap();
        assert_eq!(histogram["x"], 2.0);
        assert_eq!(histogram["y"], 3.0);
        assert_eq!(histogram["z"], 0.0);
    }

    #[test]
    fn test_missing_and_null() {
        let p: Probe = serde_json::from_str(r#"{"count":null,"label":null}"#).unwrap();
        assert!(p.count.is_none());
        assert!(p.ratio.is_none());
        assert!(p.label.is_none());
        assert!(p.series.is_none());
    }

    #[test]
    fn test_garbage_becomes_none() {
        let p: Probe = serde_json::from_str(r#"{"count":"many","ratio":{}}"#).unwrap();
        assert!(p.count.is_none());
        assert!(p.ratio.is_none());
    }
}
