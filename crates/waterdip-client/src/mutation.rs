//! Waterdip Client Mutations
//!
//! A [`Mutation`] wraps one write call and tracks whether it is running and
//! how it last failed. Nothing is invalidated automatically after a
//! mutation; callers refetch or patch their local view themselves.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use waterdip_common::{Result, WaterdipError};

use crate::http::ApiResponse;
use crate::resources::model_data::DataPerfRequest;
use crate::resources::models::{ModelCreated, ModelUpdate, NewModel};
use crate::resources::monitors::CreateMonitorRequest;
use crate::WaterdipClient;

type MutationFuture<Resp> = Pin<Box<dyn Future<Output = Result<Resp>> + Send>>;
type MutationFn<Req, Resp> = dyn Fn(Req) -> MutationFuture<Resp> + Send + Sync;

// =============================================================================
// Mutation
// =============================================================================

/// A write operation with loading and error tracking.
pub struct Mutation<Req, Resp> {
    name: &'static str,
    run: Arc<MutationFn<Req, Resp>>,
    in_flight: Arc<AtomicUsize>,
    error: Arc<Mutex<Option<WaterdipError>>>,
}

impl<Req, Resp> Clone for Mutation<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            run: Arc::clone(&self.run),
            in_flight: Arc::clone(&self.in_flight),
            error: Arc::clone(&self.error),
        }
    }
}

impl<Req, Resp> fmt::Debug for Mutation<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("name", &self.name)
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .field("error", &*self.error.lock())
            .finish()
    }
}

/// Decrements the in-flight counter even if the call is cancelled.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<Req: 'static, Resp: 'static> Mutation<Req, Resp> {
    pub fn new<F, Fut>(name: &'static str, run: F) -> Self
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp>> + Send + 'static,
    {
        Self {
            name,
            run: Arc::new(move |req| Box::pin(run(req)) as MutationFuture<Resp>),
            in_flight: Arc::new(AtomicUsize::new(0)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True while at least one call is running.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// The error of the last failed call, cleared when a new call starts.
    pub fn error(&self) -> Option<WaterdipError> {
        self.error.lock().clone()
    }

    pub fn reset(&self) {
        *self.error.lock() = None;
    }

    /// Run the call once. The error is both stored and returned.
    pub async fn mutate(&self, req: Req) -> Result<Resp> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));
        *self.error.lock() = None;

        debug!(mutation = self.name, "mutation started");
        let result = (self.run)(req).await;
        if let Err(err) = &result {
            warn!(mutation = self.name, error = %err, "mutation failed");
            *self.error.lock() = Some(err.clone());
        }
        result
    }
}

// =============================================================================
// Client Mutations
// =============================================================================

impl WaterdipClient {
    pub fn register_model_mutation(&self) -> Mutation<NewModel, ApiResponse<ModelCreated>> {
        let client = self.clone();
        Mutation::new("model.register", move |model: NewModel| {
            let client = client.clone();
            async move { client.register_model(&model).await }
        })
    }

    pub fn update_model_mutation(&self) -> Mutation<ModelUpdate, ApiResponse<Value>> {
        let client = self.clone();
        Mutation::new("model.update", move |update: ModelUpdate| {
            let client = client.clone();
            async move { client.update_model(&update).await }
        })
    }

    pub fn delete_model_mutation(&self) -> Mutation<String, ApiResponse<Value>> {
        let client = self.clone();
        Mutation::new("model.delete", move |model_id: String| {
            let client = client.clone();
            async move { client.delete_model(&model_id).await }
        })
    }

    pub fn create_monitor_mutation(&self) -> Mutation<CreateMonitorRequest, ApiResponse<Value>> {
        let client = self.clone();
        Mutation::new("monitor.create", move |request: CreateMonitorRequest| {
            let client = client.clone();
            async move { client.create_monitor(&request).await }
        })
    }

    pub fn delete_monitor_mutation(&self) -> Mutation<String, ApiResponse<Value>> {
        let client = self.clone();
        Mutation::new("monitor.delete", move |monitor_id: String| {
            let client = client.clone();
            async move { client.delete_monitor(&monitor_id).await }
        })
    }

    pub fn anomalous_export_mutation(&self) -> Mutation<DataPerfRequest, ApiResponse<Value>> {
        let client = self.clone();
        Mutation::new("model.export.anomalous", move |request: DataPerfRequest| {
            let client = client.clone();
            async move { client.create_anomalous_export(&request).await }
        })
    }
}
