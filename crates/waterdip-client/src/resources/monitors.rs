//! Waterdip Client Monitors
//!
//! Monitor list plus the create and delete calls.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use waterdip_common::{MonitorType, Result, Severity, ThresholdDirection};

use crate::de;
use crate::endpoints;
use crate::http::{ApiResponse, NoParams};
use crate::meta::{ListMeta, ListParams, RawListMeta};
use crate::resources::rows;
use crate::WaterdipClient;

// =============================================================================
// Requests
// =============================================================================

/// Query string of `list.monitors`, optionally scoped to a model/version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MonitorListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version_id: Option<String>,
    pub page: u64,
    pub limit: u64,
    pub sort: String,
    pub query: String,
}

impl MonitorListParams {
    pub fn new(list: ListParams) -> Self {
        Self {
            model_id: None,
            model_version_id: None,
            page: list.page,
            limit: list.limit,
            sort: list.sort,
            query: list.query,
        }
    }

    pub fn for_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn for_version(mut self, model_version_id: impl Into<String>) -> Self {
        self.model_version_id = Some(model_version_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorIdentification {
    pub model_id: String,
    pub model_version_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub features: Vec<String>,
    pub predictions: Vec<String>,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.predictions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub threshold: ThresholdDirection,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorConditionRequest {
    pub evaluation_metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub threshold: Threshold,
    pub evaluation_window: String,
}

/// Body of `monitor.create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateMonitorRequest {
    pub monitor_name: String,
    pub monitor_type: MonitorType,
    pub monitor_identification: MonitorIdentification,
    pub monitor_condition: MonitorConditionRequest,
    pub severity: Severity,
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorCondition {
    pub evaluation_metric: String,
    pub dimensions: Dimensions,
    pub threshold: Threshold,
    pub evaluation_window: String,
    pub baseline: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRow {
    pub monitor_id: String,
    pub monitor_name: String,
    pub monitor_type: MonitorType,
    pub identification: MonitorIdentification,
    pub condition: MonitorCondition,
    pub severity: Severity,
    pub num_alerts: u64,
    pub model_name: String,
    pub created_at: String,
    pub last_run: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorList {
    pub monitor_list: Vec<MonitorRow>,
    pub meta: ListMeta,
}

impl MonitorList {
    /// Drop a monitor from the loaded page. Returns whether a row was removed.
    pub fn remove(&mut self, monitor_id: &str) -> bool {
        let before = self.monitor_list.len();
        self.monitor_list.retain(|m| m.monitor_id != monitor_id);
        let removed = self.monitor_list.len() != before;
        if removed {
            self.meta.total = self.meta.total.saturating_sub(1);
        }
        removed
    }
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawIdentification {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_version_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDimensions {
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    predictions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawThreshold {
    #[serde(default, deserialize_with = "de::opt_string")]
    threshold: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCondition {
    #[serde(default, deserialize_with = "de::opt_string")]
    evaluation_metric: Option<String>,
    #[serde(default)]
    dimensions: Option<RawDimensions>,
    #[serde(default)]
    threshold: Option<RawThreshold>,
    #[serde(default, deserialize_with = "de::opt_string")]
    evaluation_window: Option<String>,
    #[serde(default)]
    baseline: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMonitorRow {
    #[serde(default, deserialize_with = "de::opt_string")]
    monitor_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    monitor_name: Option<String>,
    #[serde(default)]
    monitor_type: Option<MonitorType>,
    #[serde(default)]
    monitor_identification: Option<RawIdentification>,
    #[serde(default)]
    monitor_condition: Option<RawCondition>,
    #[serde(default, deserialize_with = "de::opt_string")]
    severity: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    num_alerts: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    last_run: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMonitorList {
    #[serde(default)]
    monitor_list: Option<Vec<Option<RawMonitorRow>>>,
    #[serde(default)]
    meta: Option<RawListMeta>,
}

// =============================================================================
// Normalization
// =============================================================================

fn parse_severity(raw: Option<String>) -> Severity {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("low") => Severity::Low,
        Some("high") => Severity::High,
        _ => Severity::Medium,
    }
}

fn parse_threshold(raw: RawThreshold) -> Threshold {
    let threshold = match raw.threshold.as_deref() {
        Some("lt") => ThresholdDirection::LessThan,
        Some(other) => ThresholdDirection::from_label(other),
        None => ThresholdDirection::GreaterThan,
    };
    Threshold {
        threshold,
        value: raw.value.unwrap_or(0.0),
    }
}

impl From<RawCondition> for MonitorCondition {
    fn from(raw: RawCondition) -> Self {
        let dimensions = raw.dimensions.unwrap_or_default();
        Self {
            evaluation_metric: raw.evaluation_metric.unwrap_or_default(),
            dimensions: Dimensions {
                features: dimensions.features.unwrap_or_default(),
                predictions: dimensions.predictions.unwrap_or_default(),
            },
            threshold: raw.threshold.map(parse_threshold).unwrap_or_default(),
            evaluation_window: raw.evaluation_window.unwrap_or_default(),
            baseline: raw.baseline.unwrap_or(Value::Null),
        }
    }
}

impl From<RawMonitorRow> for MonitorRow {
    fn from(raw: RawMonitorRow) -> Self {
        let identification = raw.monitor_identification.unwrap_or_default();
        Self {
            monitor_id: raw.monitor_id.unwrap_or_default(),
            monitor_name: raw.monitor_name.unwrap_or_default(),
            monitor_type: raw.monitor_type.unwrap_or_default(),
            identification: MonitorIdentification {
                model_id: identification.model_id.unwrap_or_default(),
                model_version_id: identification.model_version_id.unwrap_or_default(),
            },
            condition: raw
                .monitor_condition
                .map(MonitorCondition::from)
                .unwrap_or_default(),
            severity: parse_severity(raw.severity),
            num_alerts: raw.num_alerts.unwrap_or(0),
            model_name: raw.model_name.unwrap_or_default(),
            created_at: raw.created_at.unwrap_or_default(),
            last_run: raw.last_run.unwrap_or_default(),
        }
    }
}

impl From<RawMonitorList> for MonitorList {
    fn from(raw: RawMonitorList) -> Self {
        Self {
            monitor_list: rows(raw.monitor_list),
            meta: ListMeta::normalize(raw.meta),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

impl WaterdipClient {
    /// `GET list.monitors`
    pub async fn list_monitors(&self, params: &MonitorListParams) -> Result<ApiResponse<MonitorList>> {
        let response = self
            .http()
            .get::<Option<RawMonitorList>, _>(endpoints::LIST_MONITORS, params)
            .await?;
        Ok(response.map(|raw| MonitorList::from(raw.unwrap_or_default())))
    }

    /// `POST monitor.create`
    pub async fn create_monitor(&self, request: &CreateMonitorRequest) -> Result<ApiResponse<Value>> {
        info!(
            monitor_name = %request.monitor_name,
            monitor_type = request.monitor_type.as_str(),
            model_id = %request.monitor_identification.model_id,
            "creating monitor"
        );
        self.http()
            .post(endpoints::MONITOR_CREATE, &NoParams {}, request)
            .await
    }

    /// `DELETE monitor.delete`; the monitor id is sent verbatim as the body.
    pub async fn delete_monitor(&self, monitor_id: &str) -> Result<ApiResponse<Value>> {
        info!(monitor_id, "deleting monitor");
        self.http()
            .delete_text(endpoints::MONITOR_DELETE, monitor_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request(dimensions: Option<Dimensions>) -> CreateMonitorRequest {
        CreateMonitorRequest {
            monitor_name: "accuracy drop".into(),
            monitor_type: MonitorType::Performance,
            monitor_identification: MonitorIdentification {
                model_id: "m-1".into(),
                model_version_id: "v-1".into(),
            },
            monitor_condition: MonitorConditionRequest {
                evaluation_metric: "accuracy".into(),
                dimensions,
                threshold: Threshold {
                    threshold: ThresholdDirection::LessThan,
                    value: 0.8,
                },
                evaluation_window: "1d".into(),
            },
            severity: Severity::High,
        }
    }

    #[test]
    fn test_create_request_wire_shape() {
        let json = serde_json::to_value(sample_request(None)).unwrap();
        assert_eq!(json["monitor_type"], "PERFORMANCE");
        assert_eq!(json["monitor_condition"]["threshold"]["threshold"], "lt");
        assert_eq!(json["monitor_condition"]["threshold"]["value"], 0.8);
        assert!(json["monitor_condition"].get("dimensions").is_none());
        assert_eq!(json["severity"], "high");
    }

    #[test]
    fn test_create_request_with_dimensions() {
        let dims = Dimensions {
            features: vec!["age".into()],
            predictions: vec![],
        };
        let json = serde_json::to_value(sample_request(Some(dims))).unwrap();
        assert_eq!(json["monitor_condition"]["dimensions"]["features"][0], "age");
    }

    #[test]
    fn test_monitor_row_normalization() {
        let raw: RawMonitorList = serde_json::from_value(serde_json::json!({
            "monitor_list": [{
                "monitor_id": "mon-1",
                "monitor_type": "DATA_QUALITY",
                "monitor_identification": {"model_id": "m-1"},
                "monitor_condition": {"threshold": {"threshold": "gt", "value": "3"}},
                "severity": "HIGH",
                "num_alerts": 4
            }]
        }))
        .unwrap();
        let list = MonitorList::from(raw);
        let row = &list.monitor_list[0];
        assert_eq!(row.monitor_type, MonitorType::DataQuality);
        assert_eq!(row.identification.model_version_id, "");
        assert_eq!(
            row.condition.threshold,
            Threshold {
                threshold: ThresholdDirection::GreaterThan,
                value: 3.0
            }
        );
        assert!(row.condition.dimensions.is_empty());
        assert_eq!(row.severity, Severity::High);
        assert_eq!(row.num_alerts, 4);
        assert_eq!(row.last_run, "");
    }

    #[test]
    fn test_remove_drops_row_locally() {
        let mut list = MonitorList {
            monitor_list: vec![
                MonitorRow {
                    monitor_id: "m1".into(),
                    ..Default::default()
                },
                MonitorRow {
                    monitor_id: "m2".into(),
                    ..Default::default()
                },
            ],
            meta: ListMeta {
                total: 2,
                ..Default::default()
            },
        };
        assert!(list.remove("m1"));
        assert!(list.monitor_list.iter().all(|m| m.monitor_id != "m1"));
        assert_eq!(list.meta.total, 1);
        assert!(!list.remove("missing"));
    }

    #[test]
    fn test_missing_threshold_defaults_to_greater_than_zero() {
        let raw: RawMonitorList = serde_json::from_value(serde_json::json!({
            "monitor_list": [
                {"monitor_id": "mon-1", "monitor_condition": {"evaluation_metric": "psi"}},
                {"monitor_id": "mon-2"}
            ]
        }))
        .unwrap();
        let list = MonitorList::from(raw);
        let expected = Threshold {
            threshold: ThresholdDirection::GreaterThan,
            value: 0.0,
        };
        assert_eq!(list.monitor_list[0].condition.threshold, expected);
        assert_eq!(list.monitor_list[1].condition.threshold, expected);
    }

    #[test]
    fn test_list_params_scope() {
        let params = MonitorListParams::new(ListParams::default()).for_model("m-1");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["model_id"], "m-1");
        assert!(json.get("model_version_id").is_none());
    }
}
