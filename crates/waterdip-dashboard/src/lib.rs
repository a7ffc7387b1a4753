//! Waterdip Dashboard - Headless Dashboard Core
//!
//! Everything the monitoring dashboard does short of drawing: the signed-in
//! session and its persistence, the filters shared between pages, page
//! controllers with their table state, the monitor creation wizard, and the
//! notifications and navigation those raise.
//!
//! Key Features:
//! - Session persisted as a single JSON blob, shared with the API client
//! - Observable shared filters (date range, model/monitor scope)
//! - Keyed, cancellable page queries
//! - Pure monitor wizard transitions
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod filters;
pub mod notify;
pub mod pages;
pub mod routes;
pub mod state;
pub mod table;
pub mod wizard;

pub use filters::{DateRangeFilter, Filters, ModelMonitorContext, StateContainer};
pub use notify::{Notification, NotificationKind, Notifier};
pub use routes::{Navigator, Route};
pub use state::{AppState, FileStorage, MemoryStorage, StateStorage};
pub use table::TableState;
pub use wizard::{MonitorWizard, WizardDraft, WizardEvent, WizardStep};

use std::sync::Arc;
use tracing::info;
use waterdip_client::WaterdipClient;
use waterdip_common::{DashboardConfig, Result};

use pages::{AlertListPage, DatasetListPage, ModelDetailPage, ModelListPage, MonitorListPage};

/// One dashboard session: state, client and the handles pages share.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    state: AppState,
    client: WaterdipClient,
    filters: Filters,
    notifier: Notifier,
    navigator: Navigator,
}

impl Dashboard {
    /// Build a dashboard over the given storage, restoring any saved session.
    pub fn new(config: DashboardConfig, storage: Arc<dyn StateStorage>) -> Result<Self> {
        let state = AppState::restore(storage);
        let client = WaterdipClient::new(&config.client, state.session().clone())?;
        let start = if state.is_authenticated() {
            Route::Models
        } else {
            Route::Login
        };
        info!(
            base_url = %config.client.base_url,
            authenticated = state.is_authenticated(),
            "dashboard started"
        );
        Ok(Self {
            config,
            state,
            client,
            filters: Filters::new(),
            notifier: Notifier::new(),
            navigator: Navigator::new(start),
        })
    }

    /// Build a dashboard persisting its session in `config.state_file`.
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(config.state_file.clone()));
        Self::new(config, storage)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn client(&self) -> &WaterdipClient {
        &self.client
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn login(&self, token: impl Into<String>, org_id: impl Into<String>) -> Result<()> {
        self.state.login(token, org_id)?;
        self.navigator.navigate(Route::Models);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.state.logout()?;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    fn page_size(&self) -> u64 {
        u64::from(self.config.default_page_size)
    }

    pub fn model_list(&self) -> ModelListPage {
        ModelListPage::new(self.client.clone(), self.notifier.clone(), self.page_size())
    }

    pub fn alert_list(&self) -> AlertListPage {
        AlertListPage::new(self.client.clone(), self.page_size())
    }

    pub fn monitor_list(&self) -> MonitorListPage {
        MonitorListPage::new(
            self.client.clone(),
            self.notifier.clone(),
            self.filters.model_monitor.clone(),
            self.page_size(),
        )
    }

    pub fn dataset_list(&self) -> DatasetListPage {
        DatasetListPage::new(self.client.clone(), self.filters.clone(), self.page_size())
    }

    pub fn model_detail(&self, model_id: impl Into<String>) -> ModelDetailPage {
        ModelDetailPage::new(
            self.client.clone(),
            self.notifier.clone(),
            self.filters.clone(),
            model_id,
        )
    }

    pub fn monitor_wizard(&self, draft: WizardDraft) -> MonitorWizard {
        MonitorWizard::new(
            &self.client,
            self.notifier.clone(),
            self.navigator.clone(),
            draft,
        )
    }
}
