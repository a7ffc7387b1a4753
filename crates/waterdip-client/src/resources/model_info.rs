//! Waterdip Client Model Details
//!
//! Model overview, model info (with version list) and model version info.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waterdip_common::{DataType, Result};

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::resources::DateWindow;
use crate::WaterdipClient;

// =============================================================================
// Params
// =============================================================================

/// Query string of `model.overview/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct OverviewParams {
    #[serde(skip)]
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl OverviewParams {
    pub fn new(model_id: impl Into<String>, window: DateWindow) -> Self {
        Self {
            model_id: model_id.into(),
            start_date: window.start_date,
            end_date: window.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
struct ModelIdParam<'a> {
    model_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
struct VersionIdParam<'a> {
    model_version_id: &'a str,
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOverview {
    pub id: String,
    pub name: String,
    pub model_type: String,
    pub data_type: DataType,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersionRef {
    pub id: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDetails {
    pub model_type: String,
    pub data_type: DataType,
    pub task_type: String,
    pub description: String,
}

/// Model info; alert and prediction graphs stay raw JSON, `{}` when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub versions: Vec<ModelVersionRef>,
    pub details: ModelDetails,
    pub alerts: Value,
    pub prediction_graph: Value,
    pub predictions: Value,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            versions: Vec::new(),
            details: ModelDetails::default(),
            alerts: empty_object(),
            prediction_graph: empty_object(),
            predictions: empty_object(),
        }
    }
}

impl ModelInfo {
    /// The most recently listed version, if any.
    pub fn latest_version(&self) -> Option<&ModelVersionRef> {
        self.versions.last()
    }
}

/// One feature or prediction entry of a version schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub data_type: String,
    pub list_index: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub skip_period: String,
    pub time_period: String,
    pub aggregation_period: String,
}

/// Baseline a version is compared against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub time_window: Option<TimeWindow>,
    pub dataset_env: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersionInfo {
    pub version_id: String,
    pub version: String,
    pub model_id: String,
    pub description: String,
    pub task_type: String,
    pub created_at: String,
    pub features: BTreeMap<String, SchemaField>,
    pub predictions: BTreeMap<String, SchemaField>,
    pub baseline: Baseline,
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawModelDetails {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_type: Option<String>,
    #[serde(default)]
    data_type: Option<DataType>,
    #[serde(default, deserialize_with = "de::opt_string")]
    task_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelOverview {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default)]
    model_details: Option<RawModelDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVersionRef {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_version_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelInfo {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_name: Option<String>,
    #[serde(default)]
    model_versions: Option<Vec<Option<RawVersionRef>>>,
    #[serde(default)]
    model_details: Option<RawModelDetails>,
    #[serde(default)]
    model_alerts: Option<Value>,
    #[serde(default)]
    model_prediction_graph: Option<Value>,
    #[serde(default)]
    model_predictions: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSchemaField {
    #[serde(default, deserialize_with = "de::opt_string")]
    data_type: Option<String>,
    #[serde(default)]
    list_index: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVersionSchema {
    #[serde(default)]
    features: Option<BTreeMap<String, Option<RawSchemaField>>>,
    #[serde(default)]
    predictions: Option<BTreeMap<String, Option<RawSchemaField>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTimeWindow {
    #[serde(default, deserialize_with = "de::opt_string")]
    skip_period: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    time_period: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    aggregation_period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBaseline {
    #[serde(default)]
    time_window: Option<RawTimeWindow>,
    #[serde(default, deserialize_with = "de::opt_string")]
    dataset_env: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelVersionInfo {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_version_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_version: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    task_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    created_at: Option<String>,
    #[serde(default)]
    version_schema: Option<RawVersionSchema>,
    #[serde(default)]
    baseline: Option<RawBaseline>,
}

// =============================================================================
// Normalization
// =============================================================================

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn object_or_empty(value: Option<Value>) -> Value {
    match value {
        None | Some(Value::Null) => empty_object(),
        Some(v) => v,
    }
}

impl From<RawModelDetails> for ModelDetails {
    fn from(raw: RawModelDetails) -> Self {
        Self {
            model_type: raw.model_type.unwrap_or_default(),
            data_type: raw.data_type.unwrap_or_default(),
            task_type: raw.task_type.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
        }
    }
}

impl From<RawModelOverview> for ModelOverview {
    fn from(raw: RawModelOverview) -> Self {
        let details = raw.model_details.unwrap_or_default();
        Self {
            id: raw.model_id.unwrap_or_default(),
            name: details.model_name.unwrap_or_default(),
            model_type: details.model_type.unwrap_or_default(),
            data_type: details.data_type.unwrap_or_default(),
            description: details.description.unwrap_or_default(),
        }
    }
}

impl From<RawModelInfo> for ModelInfo {
    fn from(raw: RawModelInfo) -> Self {
        let details = raw.model_details.unwrap_or_default();
        let name = raw
            .model_name
            .or_else(|| details.model_name.clone())
            .unwrap_or_default();
        Self {
            id: raw.model_id.unwrap_or_default(),
            name,
            versions: raw
                .model_versions
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|v| ModelVersionRef {
                    id: v.model_version_id.unwrap_or_default(),
                    version: v.model_version.unwrap_or_default(),
                })
                .collect(),
            details: ModelDetails::from(details),
            alerts: object_or_empty(raw.model_alerts),
            prediction_graph: object_or_empty(raw.model_prediction_graph),
            predictions: object_or_empty(raw.model_predictions),
        }
    }
}

fn schema_fields(
    raw: Option<BTreeMap<String, Option<RawSchemaField>>>,
) -> BTreeMap<String, SchemaField> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|(name, field)| {
            let field = field.unwrap_or_default();
            (
                name,
                SchemaField {
                    data_type: field.data_type.unwrap_or_default(),
                    list_index: field.list_index.unwrap_or(Value::Null),
                },
            )
        })
        .collect()
}

impl From<RawModelVersionInfo> for ModelVersionInfo {
    fn from(raw: RawModelVersionInfo) -> Self {
        let schema = raw.version_schema.unwrap_or_default();
        let baseline = raw.baseline.unwrap_or_default();
        Self {
            version_id: raw.model_version_id.unwrap_or_default(),
            version: raw.model_version.unwrap_or_default(),
            model_id: raw.model_id.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            task_type: raw.task_type.unwrap_or_default(),
            created_at: raw.created_at.unwrap_or_default(),
            features: schema_fields(schema.features),
            predictions: schema_fields(schema.predictions),
            baseline: Baseline {
                time_window: baseline.time_window.map(|tw| TimeWindow {
                    skip_period: tw.skip_period.unwrap_or_default(),
                    time_period: tw.time_period.unwrap_or_default(),
                    aggregation_period: tw.aggregation_period.unwrap_or_default(),
                }),
                dataset_env: de::non_empty(baseline.dataset_env),
            },
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

impl WaterdipClient {
    /// `GET model.overview/{id}`
    pub async fn model_overview(&self, params: &OverviewParams) -> Result<ApiResponse<ModelOverview>> {
        let endpoint = format!("{}/{}", endpoints::MODEL_OVERVIEW, params.model_id);
        let response = self
            .http()
            .get::<Option<RawModelOverview>, _>(&endpoint, params)
            .await?;
        Ok(response.map(|raw| ModelOverview::from(raw.unwrap_or_default())))
    }

    /// `GET model.info`
    pub async fn model_info(&self, model_id: &str) -> Result<ApiResponse<ModelInfo>> {
        let response = self
            .http()
            .get::<Option<RawModelInfo>, _>(endpoints::MODEL_INFO, &ModelIdParam { model_id })
            .await?;
        Ok(response.map(|raw| ModelInfo::from(raw.unwrap_or_default())))
    }

    /// `GET model.version.info`
    pub async fn model_version_info(
        &self,
        model_version_id: &str,
    ) -> Result<ApiResponse<ModelVersionInfo>> {
        let response = self
            .http()
            .get::<Option<RawModelVersionInfo>, _>(
                endpoints::MODEL_VERSION_INFO,
                &VersionIdParam { model_version_id },
            )
            .await?;
        Ok(response.map(|raw| ModelVersionInfo::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_flattens_details() {
        let raw: RawModelOverview = serde_json::from_str(
            r#"{"model_id":"m-1","model_details":{"model_name":"churn","model_type":"binary","data_type":"TEXT"}}"#,
        )
        .unwrap();
        let overview = ModelOverview::from(raw);
        assert_eq!(overview.id, "m-1");
        assert_eq!(overview.name, "churn");
        assert_eq!(overview.data_type, DataType::Text);
        assert_eq!(overview.description, "");
    }

    #[test]
    fn test_info_graphs_default_to_empty_object() {
        let raw: RawModelInfo = serde_json::from_str(
            r#"{"model_id":"m-1","model_name":"churn","model_alerts":null,
                "model_versions":[{"model_version_id":"v-1","model_version":"V1"},null]}"#,
        )
        .unwrap();
        let info = ModelInfo::from(raw);
        assert_eq!(info.alerts, serde_json::json!({}));
        assert_eq!(info.prediction_graph, serde_json::json!({}));
        assert_eq!(info.versions.len(), 1);
        assert_eq!(info.latest_version().map(|v| v.version.as_str()), Some("V1"));
    }

    #[test]
    fn test_version_info_schema_and_baseline() {
        let raw: RawModelVersionInfo = serde_json::from_value(serde_json::json!({
            "model_version_id": "v-1",
            "model_version": "V1",
            "version_schema": {
                "features": {"age": {"data_type": "NUMERIC", "list_index": 0}},
                "predictions": {"churned": null}
            },
            "baseline": {"time_window": {"time_period": "7d"}}
        }))
        .unwrap();
        let info = ModelVersionInfo::from(raw);
        assert_eq!(info.features["age"].data_type, "NUMERIC");
        assert_eq!(info.predictions["churned"], SchemaField::default());
        let window = info.baseline.time_window.unwrap();
        assert_eq!(window.time_period, "7d");
        assert_eq!(window.skip_period, "");
        assert!(info.baseline.dataset_env.is_none());
        assert_eq!(info.created_at, "");
    }

    #[test]
    fn test_overview_params_skip_id_in_query() {
        let params = OverviewParams::new("m-1", DateWindow::default());
        assert_eq!(serde_json::to_string(&params).unwrap(), "{}");
    }
}
