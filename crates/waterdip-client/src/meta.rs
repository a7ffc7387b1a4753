//! Waterdip Client List Metadata
//!
//! Every list endpoint wraps its rows in `{ <resource>_list: [...], meta }`.
//! The server may omit `meta` entirely or any of its fields; [`ListMeta`]
//! always comes back fully populated.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::de;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_SORT: &str = "name_asc";

// =============================================================================
// List Meta
// =============================================================================

/// Pagination envelope of a list response, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub sort: String,
    pub query: String,
}

impl Default for ListMeta {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            total: 0,
            sort: DEFAULT_SORT.to_string(),
            query: String::new(),
        }
    }
}

/// `meta` as the server sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListMeta {
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub query: Option<String>,
}

impl ListMeta {
    /// Apply defaults to an optional server meta. Zero page/limit and empty
    /// sort count as missing.
    pub fn normalize(raw: Option<RawListMeta>) -> Self {
        let raw = raw.unwrap_or_default();
        Self {
            page: raw.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: raw.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
            total: raw.total.unwrap_or(0),
            sort: de::non_empty(raw.sort).unwrap_or_else(|| DEFAULT_SORT.to_string()),
            query: raw.query.unwrap_or_default(),
        }
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.total.div_ceil(self.limit.max(1))
        }
    }
}

impl From<Option<RawListMeta>> for ListMeta {
    fn from(raw: Option<RawListMeta>) -> Self {
        Self::normalize(raw)
    }
}

// =============================================================================
// List Params
// =============================================================================

/// Paging, sorting and search parameters shared by list requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    pub sort: String,
    pub query: String,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: DEFAULT_SORT.to_string(),
            query: String::new(),
        }
    }
}

impl ListParams {
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_meta_uses_defaults() {
        let meta = ListMeta::normalize(None);
        assert_eq!(meta, ListMeta::default());
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 10);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.sort, "name_asc");
        assert_eq!(meta.query, "");
    }

    #[test]
    fn test_partial_meta_fills_gaps() {
        let raw: RawListMeta = serde_json::from_str(r#"{"page":3,"total":"41"}"#).unwrap();
        let meta = ListMeta::normalize(Some(raw));
        assert_eq!(meta.page, 3);
        assert_eq!(meta.limit, 10);
        assert_eq!(meta.total, 41);
        assert_eq!(meta.sort, "name_asc");
        assert_eq!(meta.page_count(), 5);
    }

    #[test]
    fn test_zero_and_empty_fields_use_defaults() {
        let raw: RawListMeta =
            serde_json::from_str(r#"{"page":0,"limit":0,"sort":"","query":"churn"}"#).unwrap();
        let meta = ListMeta::normalize(Some(raw));
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 10);
        assert_eq!(meta.sort, "name_asc");
        assert_eq!(meta.query, "churn");
    }

    #[test]
    fn test_list_params_builder() {
        let params = ListParams::default().page(2).limit(25).sort("created_at_desc");
        assert_eq!(params.page, 2);
        assert_eq!(params.limit, 25);
        assert_eq!(params.sort, "created_at_desc");
        assert_eq!(params.query, "");
    }
}
