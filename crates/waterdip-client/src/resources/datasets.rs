//! Waterdip Client Datasets
//!
//! Dataset list, dataset info and the column statistics shared with the
//! dataset metrics endpoint.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::meta::{ListMeta, ListParams, RawListMeta};
use crate::resources::{rows, DateWindow};
use crate::WaterdipClient;

// =============================================================================
// Params
// =============================================================================

/// Query string of `list.datasets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetListParams {
    pub page: u64,
    pub limit: u64,
    pub sort: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl DatasetListParams {
    pub fn new(list: ListParams, model_id: Option<String>) -> Self {
        Self {
            page: list.page,
            limit: list.limit,
            sort: list.sort,
            query: list.query,
            model_id,
        }
    }
}

/// Query string of `dataset.info/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetInfoParams {
    #[serde(skip)]
    pub dataset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl DatasetInfoParams {
    pub fn new(dataset_id: impl Into<String>, window: DateWindow) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            start_date: window.start_date,
            end_date: window.end_date,
        }
    }
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetList {
    pub dataset_list: Vec<DatasetRow>,
    pub meta: ListMeta,
}

/// Histogram of a column: bin labels and their values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnHistogram {
    pub bins: Vec<String>,
    pub val: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericColumnStats {
    pub column_name: String,
    pub histogram: ColumnHistogram,
    pub zeros: u64,
    pub missing_total: u64,
    pub missing_percentage: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalColumnStats {
    pub column_name: String,
    pub histogram: ColumnHistogram,
    pub missing_total: u64,
    pub missing_percentage: f64,
    pub unique: u64,
    pub top: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetOverview {
    pub name: String,
    pub id: String,
    pub total_rows: u64,
    pub missing_total: u64,
    pub missing_percentage: f64,
    pub duplicate_total: u64,
    pub duplicate_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub overview: DatasetOverview,
    pub numeric_columns: Vec<NumericColumnStats>,
    pub categorical_columns: Vec<CategoricalColumnStats>,
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawDatasetRow {
    #[serde(default, deserialize_with = "de::opt_string")]
    dataset_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    dataset_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatasetList {
    #[serde(default)]
    dataset_list: Option<Vec<Option<RawDatasetRow>>>,
    #[serde(default)]
    meta: Option<RawListMeta>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawHistogram {
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    bins: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    val: Option<Vec<f64>>,
}

/// Dataset info and dataset metrics name a few numeric fields differently.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawNumericColumnStats {
    #[serde(default, deserialize_with = "de::opt_string")]
    column_name: Option<String>,
    #[serde(default)]
    histogram: Option<RawHistogram>,
    #[serde(default, alias = "zeros_total", deserialize_with = "de::opt_u64")]
    zeros: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    missing_total: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    mean: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    median: Option<f64>,
    #[serde(default, alias = "standard_deviation", deserialize_with = "de::opt_f64")]
    std_dev: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    min: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    max: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCategoricalColumnStats {
    #[serde(default, deserialize_with = "de::opt_string")]
    column_name: Option<String>,
    #[serde(default)]
    histogram: Option<RawHistogram>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    missing_total: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    unique: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    top: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatasetOverview {
    #[serde(default, deserialize_with = "de::opt_string")]
    dataset_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    dataset_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    total_row: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    missing_total: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    duplicate_total: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    duplicate_percentage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatasetInfo {
    #[serde(default)]
    dataset_overview: Option<RawDatasetOverview>,
    #[serde(default)]
    numeric_column_stats: Option<Vec<Option<RawNumericColumnStats>>>,
    #[serde(default)]
    categorical_column_stats: Option<Vec<Option<RawCategoricalColumnStats>>>,
}

// =============================================================================
// Normalization
// =============================================================================

impl From<RawHistogram> for ColumnHistogram {
    fn from(raw: RawHistogram) -> Self {
        Self {
            bins: raw.bins.unwrap_or_default(),
            val: raw.val.unwrap_or_default(),
        }
    }
}

impl From<RawNumericColumnStats> for NumericColumnStats {
    fn from(raw: RawNumericColumnStats) -> Self {
        Self {
            column_name: raw.column_name.unwrap_or_default(),
            histogram: raw.histogram.map(ColumnHistogram::from).unwrap_or_default(),
            zeros: raw.zeros.unwrap_or(0),
            missing_total: raw.missing_total.unwrap_or(0),
            missing_percentage: raw.missing_percentage.unwrap_or(0.0),
            mean: raw.mean.unwrap_or(0.0),
            median: raw.median.unwrap_or(0.0),
            std_dev: raw.std_dev.unwrap_or(0.0),
            min: raw.min.unwrap_or(0.0),
            max: raw.max.unwrap_or(0.0),
        }
    }
}

impl From<RawCategoricalColumnStats> for CategoricalColumnStats {
    fn from(raw: RawCategoricalColumnStats) -> Self {
        Self {
            column_name: raw.column_name.unwrap_or_default(),
            histogram: raw.histogram.map(ColumnHistogram::from).unwrap_or_default(),
            missing_total: raw.missing_total.unwrap_or(0),
            missing_percentage: raw.missing_percentage.unwrap_or(0.0),
            unique: raw.unique.unwrap_or(0),
            top: raw.top.unwrap_or_default(),
        }
    }
}

impl From<RawDatasetList> for DatasetList {
    fn from(raw: RawDatasetList) -> Self {
        Self {
            dataset_list: raw
                .dataset_list
                .unwrap_or_default()
                .into_iter()
                .map(|row| {
                    let row = row.unwrap_or_default();
                    DatasetRow {
                        id: row.dataset_id.unwrap_or_default(),
                        name: row.dataset_name.unwrap_or_default(),
                    }
                })
                .collect(),
            meta: ListMeta::normalize(raw.meta),
        }
    }
}

impl From<RawDatasetInfo> for DatasetInfo {
    fn from(raw: RawDatasetInfo) -> Self {
        let overview = raw.dataset_overview.unwrap_or_default();
        Self {
            overview: DatasetOverview {
                name: overview.dataset_name.unwrap_or_default(),
                id: overview.dataset_id.unwrap_or_default(),
                total_rows: overview.total_row.unwrap_or(0),
                missing_total: overview.missing_total.unwrap_or(0),
                missing_percentage: overview.missing_percentage.unwrap_or(0.0),
                duplicate_total: overview.duplicate_total.unwrap_or(0),
                duplicate_percentage: overview.duplicate_percentage.unwrap_or(0.0),
            },
            numeric_columns: rows(raw.numeric_column_stats),
            categorical_columns: rows(raw.categorical_column_stats),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

impl WaterdipClient {
    /// `GET list.datasets`
    pub async fn list_datasets(&self, params: &DatasetListParams) -> Result<ApiResponse<DatasetList>> {
        let response = self
            .http()
            .get::<Option<RawDatasetList>, _>(endpoints::LIST_DATASETS, params)
            .await?;
        Ok(response.map(|raw| DatasetList::from(raw.unwrap_or_default())))
    }

    /// `GET dataset.info/{id}`
    pub async fn dataset_info(&self, params: &DatasetInfoParams) -> Result<ApiResponse<DatasetInfo>> {
        let endpoint = format!("{}/{}", endpoints::DATASET_INFO, params.dataset_id);
        let response = self
            .http()
            .get::<Option<RawDatasetInfo>, _>(&endpoint, params)
            .await?;
        Ok(response.map(|raw| DatasetInfo::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_list_defaults() {
        let raw: RawDatasetList =
            serde_json::from_str(r#"{"dataset_list":[{"dataset_id":"d-1"},null]}"#).unwrap();
        let list = DatasetList::from(raw);
        assert_eq!(list.dataset_list[0].id, "d-1");
        assert_eq!(list.dataset_list[0].name, "");
        assert_eq!(list.dataset_list[1], DatasetRow::default());
        assert_eq!(list.meta.limit, 10);
    }

    #[test]
    fn test_dataset_info_columns() {
        let raw: RawDatasetInfo = serde_json::from_value(serde_json::json!({
            "dataset_overview": {"dataset_name": "train", "total_row": 100},
            "numeric_column_stats": [{
                "column_name": "age", "zeros_total": 3, "standard_deviation": 1.5,
                "histogram": {"bins": [0, 10], "val": ["4", 6]}
            }],
            "categorical_column_stats": [{"column_name": "city", "unique": 7, "top": "NY"}]
        }))
        .unwrap();
        let info = DatasetInfo::from(raw);
        assert_eq!(info.overview.name, "train");
        assert_eq!(info.overview.total_rows, 100);
        assert_eq!(info.overview.duplicate_total, 0);
        let age = &info.numeric_columns[0];
        assert_eq!(age.zeros, 3);
        assert_eq!(age.std_dev, 1.5);
        assert_eq!(age.histogram.bins, vec!["0", "10"]);
        assert_eq!(age.histogram.val, vec![4.0, 6.0]);
        assert_eq!(info.categorical_columns[0].top, "NY");
        assert!(info.categorical_columns[0].histogram.bins.is_empty());
    }

    #[test]
    fn test_dataset_params_carry_model_scope() {
        let params = DatasetListParams::new(ListParams::default().page(2), Some("m-1".into()));
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["model_id"], "m-1");
    }
}
