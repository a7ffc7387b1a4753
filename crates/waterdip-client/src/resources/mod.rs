//! Per-resource fetch operations.
//!
//! Each module pairs the raw server schema (every field optional) with the
//! view model pages consume, and owns the single `From<Raw>` conversion that
//! applies defaults for that resource.

pub mod alerts;
pub mod datasets;
pub mod exports;
pub mod metrics;
pub mod model_data;
pub mod model_info;
pub mod models;
pub mod monitors;
pub mod performance;
pub mod profile;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de;

/// Time window shared by the date-filtered reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(start_date: Option<DateTime<Utc>>, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

/// Per-dimension breakdown series, used by performance and drift views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    pub name: String,
    pub hist_values: Vec<f64>,
    pub buckets: Vec<String>,
    pub impact: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawBreakdownRow {
    #[serde(default, deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    hist_values: Option<Vec<f64>>,
    #[serde(default)]
    buckets: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    impact: Option<f64>,
}

impl From<RawBreakdownRow> for BreakdownRow {
    fn from(raw: RawBreakdownRow) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            hist_values: raw.hist_values.unwrap_or_default(),
            buckets: raw.buckets.unwrap_or_default(),
            impact: raw.impact.unwrap_or(0.0),
        }
    }
}

impl BreakdownRow {
    /// Smallest and largest value of the series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.hist_values.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// An x/y point of a scatter series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawPoint {
    #[serde(default, deserialize_with = "de::opt_f64")]
    x: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    y: Option<f64>,
}

impl From<RawPoint> for Point {
    fn from(raw: RawPoint) -> Self {
        Self {
            x: raw.x.unwrap_or(0.0),
            y: raw.y.unwrap_or(0.0),
        }
    }
}

/// Date part of a time bucket label (`2022-05-19T10:41:58` → `2022-05-19`).
pub fn bucket_date(bucket: &str) -> &str {
    bucket.split('T').next().unwrap_or(bucket)
}

/// Normalize a nullable list of nullable rows.
pub(crate) fn rows<R: Default, T: From<R>>(raw: Option<Vec<Option<R>>>) -> Vec<T> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|row| T::from(row.unwrap_or_default()))
        .collect()
}

/// Convert an optional list of points, dropping nulls to the origin.
pub(crate) fn points(raw: Option<Vec<Option<RawPoint>>>) -> Vec<Point> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|p| p.map(Point::from).unwrap_or_default())
        .collect()
}
