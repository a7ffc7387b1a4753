//! Waterdip Client Models
//!
//! Paginated model list plus the model register/update/delete calls.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use waterdip_common::{DataType, Result};

use crate::de;
use crate::endpoints;
use crate::http::{ApiResponse, NoParams};
use crate::meta::{ListMeta, ListParams, RawListMeta};
use crate::resources::rows;
use crate::WaterdipClient;

// =============================================================================
// View Models
// =============================================================================

/// One row of the model list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListRow {
    pub id: String,
    pub version_id: String,
    pub name: String,
    pub data_type: DataType,
    pub description: String,
    /// Prediction name → data type.
    pub predictions: BTreeMap<String, String>,
    pub created_at: String,
    pub total_predictions: u64,
    pub alert_perf: u64,
    pub alert_data_behave: u64,
    pub alert_data_integrity: u64,
    pub last_prediction: String,
}

impl ModelListRow {
    /// Alerts across all categories.
    pub fn total_alerts(&self) -> u64 {
        self.alert_perf + self.alert_data_behave + self.alert_data_integrity
    }
}

/// A page of models.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    pub model_list: Vec<ModelListRow>,
    pub meta: ListMeta,
}

/// Result of registering a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCreated {
    pub model_id: String,
    pub model_name: String,
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `model.register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewModel {
    pub model_name: String,
}

/// Body of `model.update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelUpdate {
    pub model_id: String,
    pub property_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_class: Option<Value>,
}

/// New baseline: either a dataset environment or a trailing time period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaselineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimePeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimePeriod {
    pub time_period: String,
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawModelList {
    #[serde(default)]
    model_list: Option<Vec<Option<RawModelRow>>>,
    #[serde(default)]
    meta: Option<RawListMeta>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelRow {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_version_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_name: Option<String>,
    #[serde(default)]
    data_type: Option<DataType>,
    #[serde(default, deserialize_with = "de::opt_string")]
    description: Option<String>,
    #[serde(default)]
    predictions: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "de::opt_string")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    total_predictions: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    num_alert_perf: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    num_alert_data_behave: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    num_alert_data_integrity: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    last_prediction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelCreated {
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_name: Option<String>,
}

// =============================================================================
// Normalization
// =============================================================================

/// Prediction schema entries are either a bare type name or `{data_type, ..}`.
pub(crate) fn prediction_types(raw: Option<BTreeMap<String, Value>>) -> BTreeMap<String, String> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let data_type = match &value {
                Value::Object(map) => map.get("data_type").map(de::value_to_text).unwrap_or_default(),
                other => de::value_to_text(other),
            };
            (name, data_type)
        })
        .collect()
}

impl From<RawModelRow> for ModelListRow {
    fn from(raw: RawModelRow) -> Self {
        Self {
            id: raw.model_id.unwrap_or_default(),
            version_id: raw.model_version_id.unwrap_or_default(),
            name: raw.model_name.unwrap_or_default(),
            data_type: raw.data_type.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            predictions: prediction_types(raw.predictions),
            created_at: raw.created_at.unwrap_or_default(),
            total_predictions: raw.total_predictions.unwrap_or(0),
            alert_perf: raw.num_alert_perf.unwrap_or(0),
            alert_data_behave: raw.num_alert_data_behave.unwrap_or(0),
            alert_data_integrity: raw.num_alert_data_integrity.unwrap_or(0),
            last_prediction: raw.last_prediction.unwrap_or_default(),
        }
    }
}

impl From<RawModelList> for ModelList {
    fn from(raw: RawModelList) -> Self {
        Self {
            model_list: rows(raw.model_list),
            meta: ListMeta::normalize(raw.meta),
        }
    }
}

impl From<RawModelCreated> for ModelCreated {
    fn from(raw: RawModelCreated) -> Self {
        Self {
            model_id: raw.model_id.unwrap_or_default(),
            model_name: raw.model_name.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

impl WaterdipClient {
    /// `GET list.models`
    pub async fn list_models(&self, params: &ListParams) -> Result<ApiResponse<ModelList>> {
        let response = self
            .http()
            .get::<Option<RawModelList>, _>(endpoints::LIST_MODELS, params)
            .await?;
        Ok(response.map(|raw| ModelList::from(raw.unwrap_or_default())))
    }

    /// `POST model.register`
    pub async fn register_model(&self, model: &NewModel) -> Result<ApiResponse<ModelCreated>> {
        info!(model_name = %model.model_name, "registering model");
        let response = self
            .http()
            .post::<Option<RawModelCreated>, _, _>(endpoints::MODEL_REGISTER, &NoParams {}, model)
            .await?;
        Ok(response.map(|raw| raw.map(ModelCreated::from).unwrap_or_default()))
    }

    /// `POST model.update`
    pub async fn update_model(&self, update: &ModelUpdate) -> Result<ApiResponse<Value>> {
        info!(model_id = %update.model_id, property = %update.property_name, "updating model");
        self.http()
            .post(endpoints::MODEL_UPDATE, &NoParams {}, update)
            .await
    }

    /// `POST model.delete`; the model id is sent verbatim as the body.
    pub async fn delete_model(&self, model_id: &str) -> Result<ApiResponse<Value>> {
        info!(model_id, "deleting model");
        self.http()
            .post_text(endpoints::MODEL_DELETE, model_id)
            .await
    }
}
