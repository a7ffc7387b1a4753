//! Dataset list page with the detail panel of the selected dataset.

use tracing::debug;
use waterdip_client::endpoints;
use waterdip_client::resources::datasets::{DatasetInfo, DatasetInfoParams, DatasetList, DatasetListParams};
use waterdip_client::{Query, QueryKey, QueryState, WaterdipClient};
use waterdip_common::Result;

use crate::filters::Filters;
use crate::table::TableState;

pub struct DatasetListPage {
    client: WaterdipClient,
    filters: Filters,
    table: TableState,
    selected: Option<String>,
    datasets: Query<DatasetList>,
    info: Query<DatasetInfo>,
}

impl DatasetListPage {
    pub fn new(client: WaterdipClient, filters: Filters, rows_per_page: u64) -> Self {
        Self {
            client,
            filters,
            table: TableState::new(rows_per_page),
            selected: None,
            datasets: Query::new("datasets"),
            info: Query::new("dataset.info"),
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn params(&self) -> DatasetListParams {
        let model_id = self
            .filters
            .model_monitor
            .get()
            .model_id
            .filter(|id| !id.is_empty());
        DatasetListParams::new(self.table.to_list_params("name_asc"), model_id)
    }

    /// Observe the list and, when a dataset is selected, its details.
    pub fn refresh(&self) -> Result<bool> {
        let params = self.params();
        let key = QueryKey::new(endpoints::LIST_DATASETS, &params)?;
        let client = self.client.clone();
        let mut started = self.datasets.observe(key, move || async move {
            Ok(client.list_datasets(&params).await?.into_data())
        });

        if let Some(dataset_id) = &self.selected {
            let window = self.filters.date_range.get().window();
            let params = DatasetInfoParams::new(dataset_id.clone(), window);
            // the id travels in the path, so it is keyed explicitly
            let key = QueryKey::new(endpoints::DATASET_INFO, &(&params.dataset_id, &params))?;
            let client = self.client.clone();
            started |= self.info.observe(key, move || async move {
                Ok(client.dataset_info(&params).await?.into_data())
            });
        }
        Ok(started)
    }

    pub fn set_page(&mut self, page: u64) -> Result<bool> {
        self.table.set_page(page);
        self.refresh()
    }

    pub fn search(&mut self, text: impl Into<String>) -> Result<bool> {
        self.table.set_search(text);
        self.refresh()
    }

    pub fn select(&mut self, dataset_id: Option<String>) -> Result<bool> {
        debug!(dataset_id = ?dataset_id, "dataset selected");
        if dataset_id.is_none() {
            self.info.invalidate();
        }
        self.selected = dataset_id;
        self.refresh()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self) -> QueryState<DatasetList> {
        self.datasets.snapshot()
    }

    pub fn info_state(&self) -> QueryState<DatasetInfo> {
        self.info.snapshot()
    }

    pub async fn settled(&self) -> Result<QueryState<DatasetList>> {
        self.datasets.settled().await
    }

    pub async fn info_settled(&self) -> Result<QueryState<DatasetInfo>> {
        self.info.settled().await
    }

    pub fn displayed_rows(&self) -> String {
        self.table.displayed_rows(self.state().data_or_default().meta.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ModelMonitorContext;
    use waterdip_common::PathLocation;

    #[test]
    fn test_scoped_to_context_model() {
        let client = WaterdipClient::connect("http://127.0.0.1:9").unwrap();
        let filters = Filters::new();
        let page = DatasetListPage::new(client, filters.clone(), 10);
        assert_eq!(page.params().model_id, None);

        filters
            .model_monitor
            .dispatch(ModelMonitorContext::new("m-3", "fraud", PathLocation::Dataset));
        assert_eq!(page.params().model_id.as_deref(), Some("m-3"));
    }
}
