//! Waterdip Client Exports
//!
//! Paginated export list and the anomalous-rows export trigger.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::meta::{ListMeta, ListParams, RawListMeta};
use crate::resources::model_data::DataPerfRequest;
use crate::resources::rows;
use crate::WaterdipClient;

/// Query string of `model.export.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ExportListParams {
    pub model_id: String,
    pub page: u64,
    pub limit: u64,
    pub sort: String,
    pub query: String,
}

impl ExportListParams {
    pub fn new(model_id: impl Into<String>, list: ListParams) -> Self {
        Self {
            model_id: model_id.into(),
            page: list.page,
            limit: list.limit,
            sort: list.sort,
            query: list.query,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
struct ModelIdParam<'a> {
    model_id: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id: String,
    pub model_id: String,
    pub export_type: String,
    pub status: String,
    pub object_id: String,
    pub object_url: String,
    pub created_at: String,
}

impl ExportRow {
    /// Whether the export file can be downloaded.
    pub fn is_ready(&self) -> bool {
        !self.object_url.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportList {
    pub export_list: Vec<ExportRow>,
    pub meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
struct RawExportRow {
    #[serde(default, deserialize_with = "de::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "de::opt_string")]
    export_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    object_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawExportList {
    #[serde(default)]
    export_list: Option<Vec<Option<RawExportRow>>>,
    #[serde(default)]
    meta: Option<RawListMeta>,
}

impl From<RawExportRow> for ExportRow {
    fn from(raw: RawExportRow) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            model_id: raw.model_id.unwrap_or_default(),
            export_type: raw.export_type.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            object_id: raw.object_id.unwrap_or_default(),
            object_url: raw.object_url.unwrap_or_default(),
            created_at: raw.created_at.unwrap_or_default(),
        }
    }
}

impl From<RawExportList> for ExportList {
    fn from(raw: RawExportList) -> Self {
        Self {
            export_list: rows(raw.export_list),
            meta: ListMeta::normalize(raw.meta),
        }
    }
}

impl WaterdipClient {
    /// `GET model.export.list`
    pub async fn list_exports(&self, params: &ExportListParams) -> Result<ApiResponse<ExportList>> {
        let response = self
            .http()
            .get::<Option<RawExportList>, _>(endpoints::MODEL_EXPORT_LIST, params)
            .await?;
        Ok(response.map(|raw| ExportList::from(raw.unwrap_or_default())))
    }

    /// `POST model.export.anomalous`
    pub async fn create_anomalous_export(&self, request: &DataPerfRequest) -> Result<ApiResponse<Value>> {
        info!(model_id = %request.model_id, "requesting anomalous rows export");
        let query = ModelIdParam {
            model_id: &request.model_id,
        };
        self.http()
            .post(endpoints::MODEL_EXPORT_ANOMALOUS, &query, request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_rows_default() {
        let raw: RawExportList = serde_json::from_value(serde_json::json!({
            "export_list": [
                {"id": "e-1", "type": "ANOMALOUS", "status": "DONE", "object_url": "https://x/e-1.csv"},
                {"id": "e-2"}
            ],
            "meta": {"page": 0, "limit": 0}
        }))
        .unwrap();
        let list = ExportList::from(raw);
        assert_eq!(list.export_list[0].export_type, "ANOMALOUS");
        assert!(list.export_list[0].is_ready());
        assert!(!list.export_list[1].is_ready());
        assert_eq!(list.export_list[1].status, "");
        assert_eq!(list.meta.page, 1);
        assert_eq!(list.meta.limit, 10);
    }
}
