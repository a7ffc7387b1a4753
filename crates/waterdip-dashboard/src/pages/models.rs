//! Model list page: the paginated, searchable model table and the create
//! model dialog.

use serde_json::Value;
use waterdip_client::endpoints;
use waterdip_client::resources::models::{ModelCreated, ModelList, NewModel};
use waterdip_client::{ApiResponse, ListParams, Mutation, Query, QueryKey, QueryState, WaterdipClient};
use waterdip_common::{Result, SortDirection};

use crate::notify::Notifier;
use crate::table::TableState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelSortColumn {
    #[default]
    Name,
    Created,
}

/// Which column the model table is sorted by, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelSort {
    pub column: ModelSortColumn,
    pub name: SortDirection,
    pub created: SortDirection,
}

impl ModelSort {
    pub fn as_param(&self) -> &'static str {
        match (self.column, self.name, self.created) {
            (ModelSortColumn::Name, SortDirection::Asc, _) => "model_name_asc",
            (ModelSortColumn::Name, SortDirection::Desc, _) => "model_name_desc",
            (ModelSortColumn::Created, _, SortDirection::Asc) => "created_at_asc",
            (ModelSortColumn::Created, _, SortDirection::Desc) => "created_at_desc",
        }
    }

    /// Click on a column header: select it and flip its direction.
    pub fn toggle(&mut self, column: ModelSortColumn) {
        self.column = column;
        match column {
            ModelSortColumn::Name => self.name = self.name.toggled(),
            ModelSortColumn::Created => self.created = self.created.toggled(),
        }
    }
}

pub struct ModelListPage {
    client: WaterdipClient,
    notifier: Notifier,
    table: TableState,
    sort: ModelSort,
    models: Query<ModelList>,
    register: Mutation<NewModel, ApiResponse<ModelCreated>>,
    delete: Mutation<String, ApiResponse<Value>>,
}

impl ModelListPage {
    pub fn new(client: WaterdipClient, notifier: Notifier, rows_per_page: u64) -> Self {
        Self {
            register: client.register_model_mutation(),
            delete: client.delete_model_mutation(),
            client,
            notifier,
            table: TableState::new(rows_per_page),
            sort: ModelSort::default(),
            models: Query::new("models"),
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn sort(&self) -> ModelSort {
        self.sort
    }

    pub fn params(&self) -> ListParams {
        self.table.to_list_params(self.sort.as_param())
    }

    /// Fetch the current page unless it is already loaded or loading.
    pub fn refresh(&self) -> Result<bool> {
        let params = self.params();
        let key = QueryKey::new(endpoints::LIST_MODELS, &params)?;
        let client = self.client.clone();
        Ok(self.models.observe(key, move || async move {
            Ok(client.list_models(&params).await?.into_data())
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

    pub fn toggle_sort(&mut self, column: ModelSortColumn) -> Result<bool> {
        self.sort.toggle(column);
        self.refresh()
    }

    pub fn state(&self) -> QueryState<ModelList> {
        self.models.snapshot()
    }

    pub async fn settled(&self) -> Result<QueryState<ModelList>> {
        self.models.settled().await
    }

    /// Pager label of the loaded page.
    pub fn displayed_rows(&self) -> String {
        self.table.displayed_rows(self.state().data_or_default().meta.total)
    }

    pub fn is_saving(&self) -> bool {
        self.register.is_loading() || self.delete.is_loading()
    }

    /// Register a model, then reload the table.
    pub async fn create_model(&self, model_name: impl Into<String>) -> Result<ModelCreated> {
        let model = NewModel {
            model_name: model_name.into(),
        };
        match self.register.mutate(model).await {
            Ok(response) => {
                self.notifier.success("Model created successfully!");
                self.reload()?;
                Ok(response.into_data())
            }
            Err(err) => {
                self.notifier.mutation_failed(&err);
                Err(err)
            }
        }
    }

    /// Delete a model, then reload the table.
    pub async fn delete_model(&self, model_id: impl Into<String>) -> Result<()> {
        match self.delete.mutate(model_id.into()).await {
            Ok(_) => {
                self.notifier.success("Model deleted successfully!");
                self.reload()
            }
            Err(err) => {
                self.notifier.mutation_failed(&err);
                Err(err)
            }
        }
    }

    fn reload(&self) -> Result<()> {
        let params = self.params();
        let key = QueryKey::new(endpoints::LIST_MODELS, &params)?;
        let client = self.client.clone();
        self.models.refetch(key, async move {
            Ok(client.list_models(&params).await?.into_data())
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_params() {
        let mut sort = ModelSort::default();
        assert_eq!(sort.as_param(), "model_name_asc");
        sort.toggle(ModelSortColumn::Name);
        assert_eq!(sort.as_param(), "model_name_desc");
        sort.toggle(ModelSortColumn::Created);
        assert_eq!(sort.as_param(), "created_at_desc");
        sort.toggle(ModelSortColumn::Created);
        assert_eq!(sort.as_param(), "created_at_asc");
    }

    #[test]
    fn test_params_follow_table() {
        let client = WaterdipClient::connect("http://127.0.0.1:9").unwrap();
        let page = ModelListPage::new(client, Notifier::new(), 10);
        let params = page.params();
        assert_eq!(params.page, 1);
        assert_eq!(params.sort, "model_name_asc");
    }
}
