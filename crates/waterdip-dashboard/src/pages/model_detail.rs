//! Model detail page
//!
//! Overview, version schema, performance, data profile and drift of one
//! model. Every query is keyed by the model, the selected version and the
//! shared date range, so changing any of them refetches exactly the panels
//! that depend on it. All panels load concurrently and settle on their own.
//!
//! Until a version is picked the page follows the latest version listed by
//! `model.info`; version-scoped panels start once that is known.

use serde_json::Value;
use tracing::debug;
use waterdip_client::endpoints;
use waterdip_client::resources::metrics::{DriftPsi, PsiParams};
use waterdip_client::resources::model_info::{ModelInfo, ModelOverview, ModelVersionInfo, OverviewParams};
use waterdip_client::resources::models::{BaselineUpdate, ModelUpdate, TimePeriod};
use waterdip_client::resources::performance::{ModelPerformance, PerformanceParams};
use waterdip_client::resources::profile::ModelProfile;
use waterdip_client::{ApiResponse, Mutation, Query, QueryKey, QueryState, WaterdipClient};
use waterdip_common::Result;

use crate::filters::{DateRangeFilter, Filters};
use crate::notify::Notifier;

pub const MODEL_UPDATED_MESSAGE: &str = "Model updated successfully!";

pub struct ModelDetailPage {
    client: WaterdipClient,
    notifier: Notifier,
    filters: Filters,
    model_id: String,
    selected_version: Option<String>,
    info: Query<ModelInfo>,
    overview: Query<ModelOverview>,
    version_info: Query<ModelVersionInfo>,
    performance: Query<ModelPerformance>,
    profile: Query<ModelProfile>,
    psi: Query<DriftPsi>,
    update: Mutation<ModelUpdate, ApiResponse<Value>>,
}

impl ModelDetailPage {
    pub fn new(
        client: WaterdipClient,
        notifier: Notifier,
        filters: Filters,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            update: client.update_model_mutation(),
            client,
            notifier,
            filters,
            model_id: model_id.into(),
            selected_version: None,
            info: Query::new("model.info"),
            overview: Query::new("model.overview"),
            version_info: Query::new("model.version.info"),
            performance: Query::new("model.performance"),
            profile: Query::new("model.profile"),
            psi: Query::new("metrics.drift.psi"),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Pick a version; `None` follows the latest one.
    pub fn select_version(&mut self, version_id: Option<String>) -> Result<usize> {
        self.selected_version = version_id;
        self.refresh()
    }

    /// The version panels are scoped to, once known.
    pub fn version_id(&self) -> Option<String> {
        if let Some(version) = &self.selected_version {
            return Some(version.clone());
        }
        self.info
            .snapshot()
            .data()
            .and_then(|info| info.latest_version().map(|v| v.id.clone()))
    }

    /// Observe every panel for the current model, version and date range.
    /// Returns how many fetches were started.
    pub fn refresh(&self) -> Result<usize> {
        let range: DateRangeFilter = self.filters.date_range.get();
        let window = range.window();
        let mut started = 0;

        let model_id = self.model_id.clone();
        let key = QueryKey::new(endpoints::MODEL_INFO, &model_id)?;
        let client = self.client.clone();
        started += self.info.observe(key, move || async move {
            Ok(client.model_info(&model_id).await?.into_data())
        }) as usize;

        let params = OverviewParams::new(self.model_id.clone(), window);
        let key = QueryKey::new(endpoints::MODEL_OVERVIEW, &(&params.model_id, &params))?;
        let client = self.client.clone();
        started += self.overview.observe(key, move || async move {
            Ok(client.model_overview(&params).await?.into_data())
        }) as usize;

        let model_id = self.model_id.clone();
        let key = QueryKey::new(endpoints::MODEL_PROFILE, &model_id)?;
        let client = self.client.clone();
        started += self.profile.observe(key, move || async move {
            Ok(client.model_profile(&model_id).await?.into_data())
        }) as usize;

        let Some(version_id) = self.version_id() else {
            debug!(model_id = %self.model_id, "no version yet, version panels wait");
            return Ok(started);
        };

        let key = QueryKey::new(endpoints::MODEL_VERSION_INFO, &version_id)?;
        let client = self.client.clone();
        let version = version_id.clone();
        started += self.version_info.observe(key, move || async move {
            Ok(client.model_version_info(&version).await?.into_data())
        }) as usize;

        let params = PerformanceParams::new(self.model_id.clone(), version_id.clone(), window);
        let key = QueryKey::new(endpoints::MODEL_PERFORMANCE, &params)?;
        let client = self.client.clone();
        started += self.performance.observe(key, move || async move {
            Ok(client.model_performance(&params).await?.into_data())
        }) as usize;

        let params = PsiParams::new(self.model_id.clone(), version_id, window);
        let key = QueryKey::new(endpoints::METRICS_DRIFT_PSI, &params)?;
        let client = self.client.clone();
        started += self.psi.observe(key, move || async move {
            Ok(client.drift_psi(&params).await?.into_data())
        }) as usize;

        Ok(started)
    }

    /// Wait for the model info, then start the version panels.
    pub async fn load(&self) -> Result<usize> {
        let mut started = self.refresh()?;
        self.info.settled().await?;
        started += self.refresh()?;
        Ok(started)
    }

    pub fn info(&self) -> QueryState<ModelInfo> {
        self.info.snapshot()
    }

    pub fn overview(&self) -> QueryState<ModelOverview> {
        self.overview.snapshot()
    }

    pub fn version_info(&self) -> QueryState<ModelVersionInfo> {
        self.version_info.snapshot()
    }

    pub fn performance(&self) -> QueryState<ModelPerformance> {
        self.performance.snapshot()
    }

    pub fn profile(&self) -> QueryState<ModelProfile> {
        self.profile.snapshot()
    }

    pub fn psi(&self) -> QueryState<DriftPsi> {
        self.psi.snapshot()
    }

    pub async fn performance_settled(&self) -> Result<QueryState<ModelPerformance>> {
        self.performance.settled().await
    }

    pub async fn psi_settled(&self) -> Result<QueryState<DriftPsi>> {
        self.psi.settled().await
    }

    /// The API rejects performance reads for versions without a baseline;
    /// the page then opens the baseline form.
    pub fn needs_baseline(&self) -> bool {
        self.performance
            .snapshot()
            .error()
            .map(|e| e.is_server())
            .unwrap_or(false)
    }

    pub fn is_updating(&self) -> bool {
        self.update.is_loading()
    }

    /// Set a trailing time-window baseline, e.g. `"7d"`.
    pub async fn set_time_baseline(&self, time_period: impl Into<String>) -> Result<()> {
        self.apply_update(ModelUpdate {
            model_id: self.model_id.clone(),
            property_name: "baseline".to_string(),
            baseline: Some(BaselineUpdate {
                dataset_env: None,
                time_window: Some(TimePeriod {
                    time_period: time_period.into(),
                }),
            }),
            positive_class: None,
        })
        .await
    }

    /// Use a dataset environment such as `"training"` as the baseline.
    pub async fn set_dataset_baseline(&self, dataset_env: impl Into<String>) -> Result<()> {
        self.apply_update(ModelUpdate {
            model_id: self.model_id.clone(),
            property_name: "baseline".to_string(),
            baseline: Some(BaselineUpdate {
                dataset_env: Some(dataset_env.into()),
                time_window: None,
            }),
            positive_class: None,
        })
        .await
    }

    pub async fn set_positive_class(&self, positive_class: Value) -> Result<()> {
        self.apply_update(ModelUpdate {
            model_id: self.model_id.clone(),
            property_name: "positive_class".to_string(),
            baseline: None,
            positive_class: Some(positive_class),
        })
        .await
    }

    async fn apply_update(&self, update: ModelUpdate) -> Result<()> {
        match self.update.mutate(update).await {
            Ok(_) => {
                self.notifier.success(MODEL_UPDATED_MESSAGE);
                self.performance.invalidate();
                self.version_info.invalidate();
                self.refresh()?;
                Ok(())
            }
            Err(err) => {
                self.notifier.mutation_failed(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_panels_wait_for_a_version() {
        let client = WaterdipClient::connect("http://127.0.0.1:9").unwrap();
        let page = ModelDetailPage::new(client, Notifier::new(), Filters::new(), "m-1");
        assert_eq!(page.version_id(), None);
        assert_eq!(page.refresh().unwrap(), 3);
        // same keys: nothing new
        assert_eq!(page.refresh().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_selected_version_scopes_panels() {
        let client = WaterdipClient::connect("http://127.0.0.1:9").unwrap();
        let mut page = ModelDetailPage::new(client, Notifier::new(), Filters::new(), "m-1");
        assert_eq!(page.select_version(Some("v-2".into())).unwrap(), 6);
        assert_eq!(page.version_id().as_deref(), Some("v-2"));
    }
}
