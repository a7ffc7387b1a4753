//! Waterdip Client Query Handles
//!
//! A [`Query`] memoizes one resource fetch per key. Pages call
//! [`Query::observe`] with the key derived from their current parameters;
//! the handle fetches only when the key changes, aborts the request still in
//! flight for the previous key, and publishes every state change on a
//! `tokio::sync::watch` channel.
//!
//! Dropping the handle aborts its in-flight request, so a page that goes
//! away never receives a late result.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use waterdip_common::{Result, WaterdipError};

// =============================================================================
// Query Key
// =============================================================================

/// Identity of a fetch: resource name plus its serialized parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    params: String,
}

impl QueryKey {
    pub fn new<P: Serialize + ?Sized>(resource: &'static str, params: &P) -> Result<Self> {
        Ok(Self {
            resource,
            params: serde_json::to_string(params)?,
        })
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.resource, self.params)
    }
}

// =============================================================================
// Query State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What a page reads from a query.
#[derive(Debug)]
pub struct QueryState<T> {
    pub key: Option<QueryKey>,
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<WaterdipError>,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            key: None,
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.status, QueryStatus::Success | QueryStatus::Error)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn error(&self) -> Option<&WaterdipError> {
        self.error.as_ref()
    }

    /// The loaded data, or the empty view model while loading or on error.
    pub fn data_or_default(&self) -> T
    where
        T: Clone + Default,
    {
        self.data().cloned().unwrap_or_default()
    }
}

// =============================================================================
// Query
// =============================================================================

/// Keyed, cancellable fetch handle.
pub struct Query<T> {
    name: &'static str,
    state: Arc<watch::Sender<QueryState<T>>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("name", &self.name)
            .field("status", &self.state.borrow().status)
            .finish()
    }
}

impl<T: Send + Sync + 'static> Query<T> {
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(QueryState::default());
        Self {
            name,
            state: Arc::new(tx),
            in_flight: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fetch for `key` unless it is already the current key.
    ///
    /// Returns true when a new fetch was started. Must be called from within
    /// a tokio runtime.
    pub fn observe<F, Fut>(&self, key: QueryKey, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if self.state.borrow().key.as_ref() == Some(&key) {
            return false;
        }
        self.start(key, fetch());
        true
    }

    /// Fetch for `key` even if it is the current key.
    pub fn refetch<Fut>(&self, key: QueryKey, fetch: Fut)
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.start(key, fetch);
    }

    fn start<Fut>(&self, key: QueryKey, fetch: Fut)
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock();
        if let Some(handle) = in_flight.take() {
            if !handle.is_finished() {
                debug!(query = self.name, "aborting superseded request");
                handle.abort();
            }
        }

        debug!(query = self.name, %key, "query fetch");
        self.state.send_modify(|state| {
            state.key = Some(key.clone());
            state.status = QueryStatus::Loading;
            state.data = None;
            state.error = None;
        });

        let state = Arc::clone(&self.state);
        let name = self.name;
        *in_flight = Some(tokio::spawn(async move {
            let result = fetch.await;
            state.send_modify(|current| {
                // A newer key owns the state now.
                if current.key.as_ref() != Some(&key) {
                    return;
                }
                match result {
                    Ok(data) => {
                        current.status = QueryStatus::Success;
                        current.data = Some(Arc::new(data));
                    }
                    Err(err) => {
                        debug!(query = name, error = %err, "query failed");
                        current.status = QueryStatus::Error;
                        current.error = Some(err);
                    }
                }
            });
        }));
    }

    /// Edit the loaded data of `key` in place.
    ///
    /// Returns false and changes nothing when `key` is no longer current or
    /// its data has not arrived yet. A later fetch replaces the edit.
    pub fn update_data(&self, key: &QueryKey, edit: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        self.state.send_if_modified(|state| {
            if state.key.as_ref() != Some(key) {
                return false;
            }
            let Some(data) = state.data.as_mut() else {
                return false;
            };
            edit(Arc::make_mut(data));
            true
        })
    }

    /// Abort any in-flight request and forget the current key.
    pub fn invalidate(&self) {
        if let Some(handle) = self.in_flight.lock().take() {
            handle.abort();
        }
        self.state.send_replace(QueryState::default());
    }

    /// Current state.
    pub fn snapshot(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    /// Wait until the current key has settled.
    pub async fn settled(&self) -> Result<QueryState<T>> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| !state.is_loading())
            .await
            .map_err(|_| WaterdipError::Cancelled)?;
        Ok(state.clone())
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key(page: u64) -> QueryKey {
        QueryKey::new("list.models", &serde_json::json!({ "page": page })).unwrap()
    }

    #[tokio::test]
    async fn test_same_key_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query: Query<u64> = Query::new("models");

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            query.observe(key(1), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            });
        }

        let state = query.settled().await.unwrap();
        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.data().copied(), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_key_change_discards_stale_result() {
        let query: Query<&'static str> = Query::new("models");
        query.observe(key(1), || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("stale")
        });
        assert!(query.snapshot().is_loading());

        query.observe(key(2), || async { Ok("fresh") });
        let state = query.settled().await.unwrap();
        assert_eq!(state.key, Some(key(2)));
        assert_eq!(state.data().copied(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_error_is_kept_and_default_data_served() {
        let query: Query<Vec<u32>> = Query::new("alerts");
        query.observe(key(1), || async { Err(WaterdipError::connection_failed()) });
        let state = query.settled().await.unwrap();
        assert_eq!(state.status, QueryStatus::Error);
        assert!(state.error().map(|e| e.is_transport()).unwrap_or(false));
        assert!(state.data_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_resets_state() {
        let query: Query<u8> = Query::new("monitors");
        query.observe(key(1), || async { Ok(1) });
        query.settled().await.unwrap();
        query.invalidate();
        assert_eq!(query.snapshot().status, QueryStatus::Idle);
        assert!(query.observe(key(1), || async { Ok(2) }));
    }

    #[tokio::test]
    async fn test_update_data_edits_loaded_key_only() {
        let query: Query<u8> = Query::new("monitors");
        query.observe(key(1), || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(10)
        });
        // nothing loaded yet
        assert!(!query.update_data(&key(1), |n| *n += 1));

        query.settled().await.unwrap();
        assert!(!query.update_data(&key(2), |n| *n += 1));
        assert!(query.update_data(&key(1), |n| *n -= 1));
        assert_eq!(query.snapshot().data(), Some(&9));

        // a fresh fetch for the same key replaces the edit
        query.refetch(key(1), async { Ok(10) });
        query.settled().await.unwrap();
        assert_eq!(query.snapshot().data(), Some(&10));
    }

    #[test]
    fn test_key_identity() {
        assert_eq!(key(1), key(1));
        assert_ne!(key(1), key(2));
        assert_eq!(key(3).to_string(), "list.models{\"page\":3}");
    }
}
