//! Waterdip Client Metrics
//!
//! Prediction drift (PSI) over time and per-version dataset column metrics.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::resources::datasets::{
    CategoricalColumnStats, NumericColumnStats, RawCategoricalColumnStats,
    RawNumericColumnStats,
};
use crate::resources::{bucket_date, rows, DateWindow};
use crate::WaterdipClient;

// =============================================================================
// Params
// =============================================================================

/// Query string of `metrics.drift.psi`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PsiParams {
    pub model_id: String,
    pub model_version_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl PsiParams {
    pub fn new(
        model_id: impl Into<String>,
        model_version_id: impl Into<String>,
        window: DateWindow,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model_version_id: model_version_id.into(),
            start_time: window.start_date,
            end_time: window.end_date,
        }
    }
}

/// Query string of `metrics.dataset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetMetricsParams {
    pub model_id: String,
    pub model_version_id: String,
    pub dataset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

// =============================================================================
// View Models
// =============================================================================

/// Drift score of one feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDrift {
    pub name: String,
    pub drift_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftPsi {
    /// Free-form description object, `{}` when absent.
    pub description: Value,
    pub drift_psi: Vec<Value>,
    /// PSI per time bucket.
    pub data: Vec<f64>,
    /// Bucket labels, date part only.
    pub time_buckets: Vec<String>,
    pub feat_breakdown: Vec<FeatureDrift>,
}

impl Default for DriftPsi {
    fn default() -> Self {
        Self {
            description: Value::Object(serde_json::Map::new()),
            drift_psi: Vec::new(),
            data: Vec::new(),
            time_buckets: Vec::new(),
            feat_breakdown: Vec::new(),
        }
    }
}

impl DriftPsi {
    /// Whether the response carried any series to draw.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty() || !self.drift_psi.is_empty() || !self.feat_breakdown.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetrics {
    pub numeric_columns: Vec<NumericColumnStats>,
    pub categorical_columns: Vec<CategoricalColumnStats>,
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawFeatureDrift {
    #[serde(default, deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(default, alias = "drift_score", deserialize_with = "de::opt_f64")]
    driftscore: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDriftPsi {
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    drift_psi: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    data: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    time_buckets: Option<Vec<String>>,
    #[serde(default)]
    feat_breakdown: Option<Vec<Option<RawFeatureDrift>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatasetMetrics {
    #[serde(default)]
    numeric_column_stats: Option<Vec<Option<RawNumericColumnStats>>>,
    #[serde(default)]
    categorical_column_stats: Option<Vec<Option<RawCategoricalColumnStats>>>,
}

// =============================================================================
// Normalization
// =============================================================================

impl From<RawFeatureDrift> for FeatureDrift {
    fn from(raw: RawFeatureDrift) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            drift_score: raw.driftscore.unwrap_or(0.0),
        }
    }
}

impl From<RawDriftPsi> for DriftPsi {
    fn from(raw: RawDriftPsi) -> Self {
        Self {
            description: match raw.description {
                None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
                Some(v) => v,
            },
            drift_psi: raw.drift_psi.unwrap_or_default(),
            data: raw.data.unwrap_or_default(),
            time_buckets: raw
                .time_buckets
                .unwrap_or_default()
                .iter()
                .map(|b| bucket_date(b).to_string())
                .collect(),
            feat_breakdown: rows(raw.feat_breakdown),
        }
    }
}

impl From<RawDatasetMetrics> for DatasetMetrics {
    fn from(raw: RawDatasetMetrics) -> Self {
        Self {
            numeric_columns: rows(raw.numeric_column_stats),
            categorical_columns: rows(raw.categorical_column_stats),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

impl WaterdipClient {
    /// `GET metrics.drift.psi`
    pub async fn drift_psi(&self, params: &PsiParams) -> Result<ApiResponse<DriftPsi>> {
        let response = self
            .http()
            .get::<Option<RawDriftPsi>, _>(endpoints::METRICS_DRIFT_PSI, params)
            .await?;
        Ok(response.map(|raw| DriftPsi::from(raw.unwrap_or_default())))
    }

    /// `GET metrics.dataset`
    pub async fn dataset_metrics(
        &self,
        params: &DatasetMetricsParams,
    ) -> Result<ApiResponse<DatasetMetrics>> {
        let response = self
            .http()
            .get::<Option<RawDatasetMetrics>, _>(endpoints::METRICS_DATASET, params)
            .await?;
        Ok(response.map(|raw| DatasetMetrics::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psi_series() {
        let raw: RawDriftPsi = serde_json::from_value(serde_json::json!({
            "data": [84, 77],
            "time_buckets": ["2022-05-19T10:41:58.617981", "2022-05-18T10:41:58.617988"],
            "feat_breakdown": [{"name": "Fico_Score", "driftscore": 0.1725}, null]
        }))
        .unwrap();
        let psi = DriftPsi::from(raw);
        assert!(psi.has_data());
        assert_eq!(psi.time_buckets, vec!["2022-05-19", "2022-05-18"]);
        assert_eq!(psi.feat_breakdown[0].drift_score, 0.1725);
        assert_eq!(psi.feat_breakdown[1], FeatureDrift::default());
        assert_eq!(psi.description, serde_json::json!({}));
    }

    #[test]
    fn test_empty_psi_has_no_data() {
        let psi = DriftPsi::from(RawDriftPsi::default());
        assert!(!psi.has_data());
    }

    #[test]
    fn test_dataset_metrics_columns() {
        let raw: RawDatasetMetrics = serde_json::from_value(serde_json::json!({
            "numeric_column_stats": [{"column_name": "age", "zeros": 2, "std_dev": 0.5}]
        }))
        .unwrap();
        let metrics = DatasetMetrics::from(raw);
        assert_eq!(metrics.numeric_columns[0].zeros, 2);
        assert_eq!(metrics.numeric_columns[0].std_dev, 0.5);
        assert!(metrics.categorical_columns.is_empty());
    }
}
