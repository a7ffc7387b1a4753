//! Waterdip Dashboard Table State
//!
//! Local paging, sorting and search state of a list page. The page index is
//! zero-based as tables display it; requests are one-based.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use waterdip_client::ListParams;
use waterdip_common::SortDirection;

pub const DEFAULT_ROWS_PER_PAGE: u64 = 10;

/// Rows-per-page choices offered by list tables.
pub const ROWS_PER_PAGE_OPTIONS: [u64; 3] = [5, 10, 50];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    page: u64,
    rows_per_page: u64,
    sort_direction: SortDirection,
    search: String,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

impl TableState {
    pub fn new(rows_per_page: u64) -> Self {
        Self {
            page: 0,
            rows_per_page: rows_per_page.max(1),
            sort_direction: SortDirection::Asc,
            search: String::new(),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn rows_per_page(&self) -> u64 {
        self.rows_per_page
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page;
    }

    /// Changing the page size returns to the first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: u64) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 0;
    }

    /// Changing the search text returns to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.page = 0;
        }
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    pub fn toggle_sort(&mut self) -> SortDirection {
        self.sort_direction = self.sort_direction.toggled();
        self.sort_direction
    }

    /// Request parameters for this table with the given sort key.
    pub fn to_list_params(&self, sort: impl Into<String>) -> ListParams {
        ListParams::default()
            .page(self.page.saturating_add(1))
            .limit(self.rows_per_page)
            .sort(sort)
            .query(self.search.clone())
    }

    /// Pager label, e.g. `11–20 of 25`.
    pub fn displayed_rows(&self, total: u64) -> String {
        if total == 0 {
            return "0–0 of 0".to_string();
        }
        let start = self.page.saturating_mul(self.rows_per_page);
        let from = start.saturating_add(1).min(total);
        let to = start.saturating_add(self.rows_per_page).min(total);
        format!("{}–{} of {}", from, to, total)
    }

    /// Number of pages for `total` rows.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.rows_per_page)
    }
}
