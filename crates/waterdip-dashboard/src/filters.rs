//! Waterdip Dashboard Shared Filters
//!
//! State several pages read at once: the selected date range and the
//! model/monitor scope. Each value lives in a [`StateContainer`] that is
//! created once and handed to every page controller that needs it.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use waterdip_client::resources::DateWindow;
use waterdip_common::utils::compute_date_range;
use waterdip_common::PathLocation;

// =============================================================================
// State Container
// =============================================================================

/// Observable value with a single replace action.
#[derive(Debug)]
pub struct StateContainer<T> {
    name: &'static str,
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for StateContainer<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug> StateContainer<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            name,
            tx: Arc::new(tx),
        }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value. Observers are only woken when it changed.
    pub fn dispatch(&self, value: T) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
        if changed {
            debug!(container = self.name, value = ?*self.tx.borrow(), "state updated");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

// =============================================================================
// Date Range
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeFilter {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    /// A range with the earlier date first.
    pub fn new(first: Option<DateTime<Utc>>, second: Option<DateTime<Utc>>) -> Self {
        match (first, second) {
            (Some(a), Some(b)) if a > b => Self {
                from_date: Some(b),
                to_date: Some(a),
            },
            _ => Self {
                from_date: first,
                to_date: second,
            },
        }
    }

    pub fn is_set(&self) -> bool {
        self.from_date.is_some() && self.to_date.is_some()
    }

    /// Short span label such as `3M`, or `None` while either end is unset.
    pub fn label(&self) -> Option<String> {
        compute_date_range(self.from_date, self.to_date)
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.from_date, self.to_date)
    }
}

impl StateContainer<DateRangeFilter> {
    /// Set both ends; they are stored in order.
    pub fn set(&self, first: Option<DateTime<Utc>>, second: Option<DateTime<Utc>>) -> bool {
        self.dispatch(DateRangeFilter::new(first, second))
    }
}

// =============================================================================
// Model / Monitor Context
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMonitorContext {
    #[serde(rename = "modelID")]
    pub model_id: Option<String>,
    pub model_name: Option<String>,
    pub path_location: Option<PathLocation>,
}

impl ModelMonitorContext {
    pub fn new(
        model_id: impl Into<String>,
        model_name: impl Into<String>,
        path_location: PathLocation,
    ) -> Self {
        Self {
            model_id: Some(model_id.into()),
            model_name: Some(model_name.into()),
            path_location: Some(path_location),
        }
    }
}

/// The shared containers a dashboard session owns.
#[derive(Debug, Clone)]
pub struct Filters {
    pub date_range: StateContainer<DateRangeFilter>,
    pub model_monitor: StateContainer<ModelMonitorContext>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            date_range: StateContainer::new("dateRangeFilter", DateRangeFilter::default()),
            model_monitor: StateContainer::new("modelMonitorState", ModelMonitorContext::default()),
        }
    }
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }
}
