//! Alert list page.

use waterdip_client::endpoints;
use waterdip_client::resources::alerts::AlertList;
use waterdip_client::{ListParams, Query, QueryKey, QueryState, WaterdipClient};
use waterdip_common::{Result, SortDirection};

use crate::table::TableState;

/// Alerts sort by monitor name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertSort(pub SortDirection);

impl AlertSort {
    pub fn as_param(&self) -> &'static str {
        match self.0 {
            SortDirection::Asc => "name_asc",
            SortDirection::Desc => "name_desc",
        }
    }
}

pub struct AlertListPage {
    client: WaterdipClient,
    table: TableState,
    alerts: Query<AlertList>,
}

impl AlertListPage {
    pub fn new(client: WaterdipClient, rows_per_page: u64) -> Self {
        Self {
            client,
            table: TableState::new(rows_per_page),
            alerts: Query::new("alerts"),
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn params(&self) -> ListParams {
        let sort = AlertSort(self.table.sort_direction());
        self.table.to_list_params(sort.as_param())
    }

    pub fn refresh(&self) -> Result<bool> {
        let params = self.params();
        let key = QueryKey::new(endpoints::LIST_INCIDENTS, &params)?;
        let client = self.client.clone();
        Ok(self.alerts.observe(key, move || async move {
            Ok(client.list_alerts(&params).await?.into_data())
        }))
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

    pub fn toggle_sort(&mut self) -> Result<bool> {
        self.table.toggle_sort();
        self.refresh()
    }

    pub fn state(&self) -> QueryState<AlertList> {
        self.alerts.snapshot()
    }

    pub async fn settled(&self) -> Result<QueryState<AlertList>> {
        self.alerts.settled().await
    }

    pub fn displayed_rows(&self) -> String {
        self.table.displayed_rows(self.state().data_or_default().meta.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_toggle_changes_param() {
        let client = WaterdipClient::connect("http://127.0.0.1:9").unwrap();
        let mut page = AlertListPage::new(client, 10);
        assert_eq!(page.params().sort, "name_asc");
        page.table.toggle_sort();
        assert_eq!(page.params().sort, "name_desc");
    }
}
