//! Waterdip API endpoint names.
//!
//! Every endpoint lives under `/v1/` and uses dot separated resource names.

pub const LIST_MODELS: &str = "list.models";
pub const MODEL_OVERVIEW: &str = "model.overview";
pub const MODEL_INFO: &str = "model.info";
pub const MODEL_VERSION_INFO: &str = "model.version.info";
pub const MODEL_PERFORMANCE: &str = "model.performance";
pub const MODEL_PROFILE: &str = "model.profile";
pub const MODEL_REGISTER: &str = "model.register";
pub const MODEL_UPDATE: &str = "model.update";
pub const MODEL_DELETE: &str = "model.delete";

pub const DATA_PERF_PCA: &str = "data.perf.pca";
pub const DATA_PERF_CLUSTER: &str = "data.perf.cluster";
pub const DATA_PERF_ANOMALOUS: &str = "data.perf.anomalous";

pub const METRICS_DRIFT_PSI: &str = "metrics.drift.psi";
pub const METRICS_DATASET: &str = "metrics.dataset";

pub const LIST_DATASETS: &str = "list.datasets";
pub const DATASET_INFO: &str = "dataset.info";

pub const MODEL_EXPORT_LIST: &str = "model.export.list";
pub const MODEL_EXPORT_ANOMALOUS: &str = "model.export.anomalous";

pub const MONITOR_CREATE: &str = "monitor.create";
pub const MONITOR_DELETE: &str = "monitor.delete";
pub const LIST_MONITORS: &str = "list.monitors";

pub const LIST_INCIDENTS: &str = "list.incidents";

/// Join the base URL and an endpoint path into a full `/v1/` URL.
pub fn make_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/v1/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
