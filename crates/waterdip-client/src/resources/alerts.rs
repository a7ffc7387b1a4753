//! Waterdip Client Alerts
//!
//! Paginated incident list.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::meta::{ListMeta, ListParams, RawListMeta};
use crate::resources::rows;
use crate::WaterdipClient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRow {
    pub monitor_id: String,
    pub monitor_name: String,
    pub monitor_method: String,
    pub model_id: String,
    pub severity: String,
    pub status: String,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertList {
    pub alert_list: Vec<AlertRow>,
    pub meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
struct RawAlertRow {
    #[serde(default, deserialize_with = "de::opt_string")]
    monitor_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    monitor_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    monitor_method: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    model_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    severity: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAlertList {
    #[serde(default)]
    alert_list: Option<Vec<Option<RawAlertRow>>>,
    #[serde(default)]
    meta: Option<RawListMeta>,
}

impl From<RawAlertRow> for AlertRow {
    fn from(raw: RawAlertRow) -> Self {
        Self {
            monitor_id: raw.monitor_id.unwrap_or_default(),
            monitor_name: raw.monitor_name.unwrap_or_default(),
            monitor_method: raw.monitor_method.unwrap_or_default(),
            model_id: raw.model_id.unwrap_or_default(),
            severity: raw.severity.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            time: raw.time.unwrap_or_default(),
        }
    }
}

impl From<RawAlertList> for AlertList {
    fn from(raw: RawAlertList) -> Self {
        Self {
            alert_list: rows(raw.alert_list),
            meta: ListMeta::normalize(raw.meta),
        }
    }
}

impl WaterdipClient {
    /// `GET list.incidents`
    pub async fn list_alerts(&self, params: &ListParams) -> Result<ApiResponse<AlertList>> {
        let response = self
            .http()
            .get::<Option<RawAlertList>, _>(endpoints::LIST_INCIDENTS, params)
            .await?;
        Ok(response.map(|raw| AlertList::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_rows_and_meta_default() {
        let raw: RawAlertList = serde_json::from_value(serde_json::json!({
            "alert_list": [{"monitor_id": "mon-1", "monitor_name": "drift", "severity": "HIGH"}]
        }))
        .unwrap();
        let list = AlertList::from(raw);
        assert_eq!(list.alert_list[0].monitor_id, "mon-1");
        assert_eq!(list.alert_list[0].status, "");
        assert_eq!(list.meta.total, 0);
        assert_eq!(list.meta.sort, "name_asc");
    }

    #[test]
    fn test_missing_alert_list() {
        let raw: RawAlertList = serde_json::from_str(r#"{"meta":{"total":4}}"#).unwrap();
        let list = AlertList::from(raw);
        assert!(list.alert_list.is_empty());
        assert_eq!(list.meta.total, 4);
    }
}
