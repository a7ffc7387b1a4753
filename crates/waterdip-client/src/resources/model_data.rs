//! Waterdip Client Data Performance
//!
//! PCA components, serving/training clusters and anomalous rows for a model.
//! All three are POSTs with `model_id` in the query string and the time
//! window (plus paging for anomalous rows) in the body.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::meta::{ListMeta, RawListMeta};
use crate::resources::{points, DateWindow, Point, RawPoint};
use crate::WaterdipClient;

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
struct ModelIdParam<'a> {
    model_id: &'a str,
}

/// Time-window body shared by PCA and cluster reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DataPerfRequest {
    #[serde(skip)]
    pub model_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl DataPerfRequest {
    pub fn new(model_id: impl Into<String>, window: DateWindow) -> Self {
        Self {
            model_id: model_id.into(),
            start_time: window.start_date,
            end_time: window.end_date,
        }
    }
}

/// Body of `data.perf.anomalous`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AnomalousRequest {
    #[serde(skip)]
    pub model_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub limit: u64,
    pub page: u64,
    pub sort: String,
}

impl AnomalousRequest {
    pub fn new(model_id: impl Into<String>, window: DateWindow) -> Self {
        Self {
            model_id: model_id.into(),
            start_time: window.start_date,
            end_time: window.end_date,
            limit: crate::meta::DEFAULT_LIMIT,
            page: crate::meta::DEFAULT_PAGE,
            sort: crate::meta::DEFAULT_SORT.to_string(),
        }
    }

    pub fn paged(mut self, page: u64, limit: u64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PcaComponent {
    pub name: String,
    pub bin_keys: Vec<String>,
    pub serving: Vec<f64>,
    pub training: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataPerfPca {
    pub components: Vec<PcaComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub cluster_id: String,
    pub serving_count: u64,
    pub training_boundary: Vec<Point>,
    pub serving_data: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataPerfCluster {
    pub clusters: BTreeMap<String, Cluster>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPerfAnomalous {
    pub clusters: BTreeMap<String, Vec<Point>>,
    pub anomalous: Vec<Point>,
    pub total: u64,
    pub data: Vec<String>,
    /// Column → rows, each row rendered as text.
    pub data_dict: BTreeMap<String, Vec<BTreeMap<String, String>>>,
    pub row_names: Vec<String>,
    pub data_list: Vec<BTreeMap<String, Value>>,
    pub meta: ListMeta,
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawPcaComponent {
    #[serde(default, deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    bin_keys: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    serving: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    training: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPca {
    #[serde(default)]
    components: Option<Vec<Option<RawPcaComponent>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCluster {
    #[serde(default, deserialize_with = "de::opt_string")]
    cluster_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    serving_count: Option<u64>,
    #[serde(default)]
    training_boundary: Option<Vec<Option<RawPoint>>>,
    #[serde(default)]
    serving_data: Option<Vec<Option<RawPoint>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawClusters {
    #[serde(default)]
    clusters: Option<BTreeMap<String, Option<RawCluster>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAnomalous {
    #[serde(default)]
    clusters: Option<BTreeMap<String, Option<Vec<Option<RawPoint>>>>>,
    #[serde(default)]
    anomalous: Option<Vec<Option<RawPoint>>>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    total: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    data: Option<Vec<String>>,
    #[serde(default)]
    data_dict: Option<BTreeMap<String, Option<Vec<Option<BTreeMap<String, Value>>>>>>,
    #[serde(default, deserialize_with = "de::opt_string_vec")]
    row_names: Option<Vec<String>>,
    #[serde(default)]
    data_list: Option<Vec<Option<BTreeMap<String, Value>>>>,
    #[serde(default)]
    meta: Option<RawListMeta>,
}

// =============================================================================
// Normalization
// =============================================================================

impl From<RawPca> for DataPerfPca {
    fn from(raw: RawPca) -> Self {
        Self {
            components: raw
                .components
                .unwrap_or_default()
                .into_iter()
                .map(|c| {
                    let c = c.unwrap_or_default();
                    PcaComponent {
                        name: c.name.unwrap_or_default(),
                        bin_keys: c.bin_keys.unwrap_or_default(),
                        serving: c.serving.unwrap_or_default(),
                        training: c.training.unwrap_or_default(),
                    }
                })
                .collect(),
        }
    }
}

impl From<RawClusters> for DataPerfCluster {
    fn from(raw: RawClusters) -> Self {
        Self {
            clusters: raw
                .clusters
                .unwrap_or_default()
                .into_iter()
                .map(|(key, cluster)| {
                    let cluster = cluster.unwrap_or_default();
                    (
                        key,
                        Cluster {
                            cluster_id: cluster.cluster_id.unwrap_or_default(),
                            serving_count: cluster.serving_count.unwrap_or(0),
                            training_boundary: points(cluster.training_boundary),
                            serving_data: points(cluster.serving_data),
                        },
                    )
                })
                .collect(),
        }
    }
}

fn text_row(row: Option<BTreeMap<String, Value>>) -> BTreeMap<String, String> {
    row.unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, de::value_to_text(&v)))
        .collect()
}

impl From<RawAnomalous> for DataPerfAnomalous {
    fn from(raw: RawAnomalous) -> Self {
        Self {
            clusters: raw
                .clusters
                .unwrap_or_default()
                .into_iter()
                .map(|(key, pts)| (key, points(pts)))
                .collect(),
            anomalous: points(raw.anomalous),
            total: raw.total.unwrap_or(0),
            data: raw.data.unwrap_or_default(),
            data_dict: raw
                .data_dict
                .unwrap_or_default()
                .into_iter()
                .map(|(key, rows)| {
                    (
                        key,
                        rows.unwrap_or_default().into_iter().map(text_row).collect(),
                    )
                })
                .collect(),
            row_names: raw.row_names.unwrap_or_default(),
            data_list: raw
                .data_list
                .unwrap_or_default()
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
            meta: ListMeta::normalize(raw.meta),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

impl WaterdipClient {
    /// `POST data.perf.pca`
    pub async fn data_perf_pca(&self, request: &DataPerfRequest) -> Result<ApiResponse<DataPerfPca>> {
        let query = ModelIdParam {
            model_id: &request.model_id,
        };
        let response = self
            .http()
            .post::<Option<RawPca>, _, _>(endpoints::DATA_PERF_PCA, &query, request)
            .await?;
        Ok(response.map(|raw| DataPerfPca::from(raw.unwrap_or_default())))
    }

    /// `POST data.perf.cluster`
    pub async fn data_perf_cluster(
        &self,
        request: &DataPerfRequest,
    ) -> Result<ApiResponse<DataPerfCluster>> {
        let query = ModelIdParam {
            model_id: &request.model_id,
        };
        let response = self
            .http()
            .post::<Option<RawClusters>, _, _>(endpoints::DATA_PERF_CLUSTER, &query, request)
            .await?;
        Ok(response.map(|raw| DataPerfCluster::from(raw.unwrap_or_default())))
    }

    /// `POST data.perf.anomalous`
    pub async fn data_perf_anomalous(
        &self,
        request: &AnomalousRequest,
    ) -> Result<ApiResponse<DataPerfAnomalous>> {
        let query = ModelIdParam {
            model_id: &request.model_id,
        };
        let response = self
            .http()
            .post::<Option<RawAnomalous>, _, _>(endpoints::DATA_PERF_ANOMALOUS, &query, request)
            .await?;
        Ok(response.map(|raw| DataPerfAnomalous::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pca_components_default() {
        let raw: RawPca =
            serde_json::from_str(r#"{"components":[{"name":"pc1","serving":[1,2]},null]}"#).unwrap();
        let pca = DataPerfPca::from(raw);
        assert_eq!(pca.components.len(), 2);
        assert_eq!(pca.components[0].serving, vec![1.0, 2.0]);
        assert!(pca.components[0].training.is_empty());
        assert_eq!(pca.components[1], PcaComponent::default());
    }

    #[test]
    fn test_clusters_keyed() {
        let raw: RawClusters = serde_json::from_value(serde_json::json!({
            "clusters": {"0": {"cluster_id": "c0", "serving_count": "12",
                               "serving_data": [{"x": 1, "y": 1}]}}
        }))
        .unwrap();
        let clusters = DataPerfCluster::from(raw);
        let c0 = &clusters.clusters["0"];
        assert_eq!(c0.cluster_id, "c0");
        assert_eq!(c0.serving_count, 12);
        assert_eq!(c0.serving_data, vec![Point { x: 1.0, y: 1.0 }]);
        assert!(c0.training_boundary.is_empty());
    }

    #[test]
    fn test_anomalous_rows_use_their_own_values() {
        let raw: RawAnomalous = serde_json::from_value(serde_json::json!({
            "data_dict": {
                "age": [{"value": 31, "flag": null}, {"value": 47, "flag": true}]
            },
            "total": 2
        }))
        .unwrap();
        let anomalous = DataPerfAnomalous::from(raw);
        let rows = &anomalous.data_dict["age"];
        assert_eq!(rows[0]["value"], "31");
        assert_eq!(rows[0]["flag"], "");
        assert_eq!(rows[1]["value"], "47");
        assert_eq!(rows[1]["flag"], "true");
        assert_eq!(anomalous.total, 2);
        assert_eq!(anomalous.meta, ListMeta::default());
    }

    #[test]
    fn test_anomalous_request_body_and_query_split() {
        let request = AnomalousRequest::new("m-1", DateWindow::default()).paged(2, 25);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("model_id").is_none());
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 25);
        assert_eq!(body["sort"], "name_asc");
        assert!(body["start_time"].is_null());
    }
}
