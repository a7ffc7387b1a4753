//! Waterdip Client Model Performance
//!
//! Accuracy over time plus the per-dimension performance breakdown.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::resources::{bucket_date, BreakdownRow, DateWindow, RawBreakdownRow};
use crate::WaterdipClient;

/// Query string of `model.performance`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PerformanceParams {
    pub model_id: String,
    pub model_version_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl PerformanceParams {
    pub fn new(
        model_id: impl Into<String>,
        model_version_id: impl Into<String>,
        window: DateWindow,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model_version_id: model_version_id.into(),
            start_date: window.start_date,
            end_date: window.end_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub id: String,
    /// Bucket labels, date part only.
    pub time_buckets: Vec<String>,
    pub accuracy: Vec<f64>,
    pub breakdown: Vec<BreakdownRow>,
}

impl ModelPerformance {
    /// Mean accuracy across buckets.
    pub fn average_accuracy(&self) -> Option<f64> {
        if self.accuracy.is_empty() {
            return None;
        }
        Some(self.accuracy.iter().sum::<f64>() / self.accuracy.len() as f64)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawAccuracy {
    #[serde(default)]
    time_buckets: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    accuracy_data: Option<Vec<f64>>,
    #[serde(default)]
    perf_breakdown: Option<Vec<RawBreakdownRow>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelPerformance {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default)]
    accuracy: Option<RawAccuracy>,
}

impl From<RawModelPerformance> for ModelPerformance {
    fn from(raw: RawModelPerformance) -> Self {
        let accuracy = raw.accuracy.unwrap_or_default();
        Self {
            id: raw.model_id.unwrap_or_default(),
            time_buckets: accuracy
                .time_buckets
                .unwrap_or_default()
                .iter()
                .map(|b| bucket_date(b).to_string())
                .collect(),
            accuracy: accuracy.accuracy_data.unwrap_or_default(),
            breakdown: accuracy
                .perf_breakdown
                .unwrap_or_default()
                .into_iter()
                .map(BreakdownRow::from)
                .collect(),
        }
    }
}

impl WaterdipClient {
    /// `GET model.performance`
    pub async fn model_performance(
        &self,
        params: &PerformanceParams,
    ) -> Result<ApiResponse<ModelPerformance>> {
        let response = self
            .http()
            .get::<Option<RawModelPerformance>, _>(endpoints::MODEL_PERFORMANCE, params)
            .await?;
        Ok(response.map(|raw| ModelPerformance::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_normalization() {
        let raw: RawModelPerformance = serde_json::from_value(serde_json::json!({
            "model_id": "m-1",
            "accuracy": {
                "time_buckets": ["2023-01-01T00:00:00", "2023-01-02T00:00:00"],
                "accuracy_data": [0.5, "0.7"],
                "perf_breakdown": [{"name": "age", "hist_values": [0.1], "impact": 0.2}]
            }
        }))
        .unwrap();
        let perf = ModelPerformance::from(raw);
        assert_eq!(perf.time_buckets, vec!["2023-01-01", "2023-01-02"]);
        assert_eq!(perf.accuracy, vec![0.5, 0.7]);
        assert_eq!(perf.breakdown[0].name, "age");
        assert!(perf.breakdown[0].buckets.is_empty());
        assert!((perf.average_accuracy().unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_missing_accuracy_block() {
        let raw: RawModelPerformance = serde_json::from_str(r#"{"model_id":"m-1"}"#).unwrap();
        let perf = ModelPerformance::from(raw);
        assert!(perf.time_buckets.is_empty());
        assert!(perf.breakdown.is_empty());
        assert_eq!(perf.average_accuracy(), None);
    }

    #[test]
    fn test_params_serialize_window_only_when_set() {
        let params = PerformanceParams::new("m-1", "v-1", DateWindow::default());
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"model_id": "m-1", "model_version_id": "v-1"}));
    }
}
