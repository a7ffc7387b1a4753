//! Headless page controllers.
//!
//! A page owns its local table state, derives the request parameters from it
//! and from the shared filters, and asks its [`Query`] handles to observe the
//! resulting keys. Renderers read the query states; nothing here draws.
//!
//! [`Query`]: waterdip_client::Query

pub mod alerts;
pub mod datasets;
pub mod model_detail;
pub mod models;
pub mod monitors;

pub use alerts::{AlertListPage, AlertSort};
pub use datasets::DatasetListPage;
pub use model_detail::ModelDetailPage;
pub use models::{ModelListPage, ModelSort, ModelSortColumn};
pub use monitors::MonitorListPage;
