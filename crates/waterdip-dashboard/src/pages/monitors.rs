//! Monitor list page, optionally scoped to the model in the shared
//! model/monitor context.
//!
//! Deleting a monitor drops its row from the loaded page in place; the list
//! is not refetched. A delete that lands while the page is still loading
//! reloads it instead, since that response may predate the delete.

use serde_json::Value;
use tracing::debug;
use waterdip_client::endpoints;
use waterdip_client::resources::monitors::{MonitorList, MonitorListParams};
use waterdip_client::{ApiResponse, Mutation, Query, QueryKey, QueryState, QueryStatus, WaterdipClient};
use waterdip_common::Result;

use crate::filters::{ModelMonitorContext, StateContainer};
use crate::notify::Notifier;
use crate::table::TableState;

pub const MONITOR_DELETED_MESSAGE: &str = "Deleted Monitor.";

pub struct MonitorListPage {
    client: WaterdipClient,
    notifier: Notifier,
    context: StateContainer<ModelMonitorContext>,
    table: TableState,
    monitors: Query<MonitorList>,
    delete: Mutation<String, ApiResponse<Value>>,
}

impl MonitorListPage {
    pub fn new(
        client: WaterdipClient,
        notifier: Notifier,
        context: StateContainer<ModelMonitorContext>,
        rows_per_page: u64,
    ) -> Self {
        Self {
            delete: client.delete_monitor_mutation(),
            client,
            notifier,
            context,
            table: TableState::new(rows_per_page),
            monitors: Query::new("monitors"),
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn params(&self) -> MonitorListParams {
        let params = MonitorListParams::new(self.table.to_list_params("name_asc"));
        match self.context.get().model_id {
            Some(model_id) if !model_id.is_empty() => params.for_model(model_id),
            _ => params,
        }
    }

    pub fn refresh(&self) -> Result<bool> {
        let params = self.params();
        let key = QueryKey::new(endpoints::LIST_MONITORS, &params)?;
        let client = self.client.clone();
        Ok(self.monitors.observe(key, move || async move {
            Ok(client.list_monitors(&params).await?.into_data())
        }))
    }

    fn reload(&self) -> Result<()> {
        let params = self.params();
        let key = QueryKey::new(endpoints::LIST_MONITORS, &params)?;
        let client = self.client.clone();
        self.monitors.refetch(key, async move {
            Ok(client.list_monitors(&params).await?.into_data())
        });
        Ok(())
    }

    pub fn set_page(&mut self, page: u64) -> Result<bool> {
        self.table.set_page(page);
        self.refresh()
    }

    pub fn set_rows_per_page(&mut self, rows: u64) -> Result<bool> {
        self.table.set_rows_per_page(rows);
        self.refresh()
    }

    pub fn search(&mut self, text: impl Into<String>) -> Result<bool> {
        self.table.set_search(text);
        self.refresh()
    }

    pub fn state(&self) -> QueryState<MonitorList> {
        self.monitors.snapshot()
    }

    pub async fn settled(&self) -> Result<QueryState<MonitorList>> {
        self.monitors.settled().await
    }

    /// The rows to show: the loaded page minus anything deleted from it.
    pub fn list(&self) -> MonitorList {
        self.state().data_or_default()
    }

    pub fn displayed_rows(&self) -> String {
        self.table.displayed_rows(self.list().meta.total)
    }

    pub fn is_deleting(&self) -> bool {
        self.delete.is_loading()
    }

    /// Delete a monitor and drop its row from the loaded page.
    pub async fn delete(&self, monitor_id: &str) -> Result<()> {
        if let Err(err) = self.delete.mutate(monitor_id.to_string()).await {
            self.notifier.mutation_failed(&err);
            return Err(err);
        }

        let state = self.state();
        if let Some(key) = state.key {
            let mut removed = false;
            let applied = self
                .monitors
                .update_data(&key, |list| removed = list.remove(monitor_id));
            debug!(monitor_id, applied, removed, "monitor removed from loaded page");
            if !applied && state.status == QueryStatus::Loading {
                self.reload()?;
            }
        }
        self.notifier.info(MONITOR_DELETED_MESSAGE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waterdip_common::PathLocation;

    #[test]
    fn test_params_follow_context() {
        let client = WaterdipClient::connect("http://127.0.0.1:9").unwrap();
        let context = StateContainer::new("modelMonitorState", ModelMonitorContext::default());
        let page = MonitorListPage::new(client, Notifier::new(), context.clone(), 10);
        assert_eq!(page.params().model_id, None);

        context.dispatch(ModelMonitorContext::new("m-1", "churn", PathLocation::Model));
        assert_eq!(page.params().model_id.as_deref(), Some("m-1"));
        assert_eq!(page.params().page, 1);
    }
}
