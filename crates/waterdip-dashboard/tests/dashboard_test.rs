//! End-to-end tests for the dashboard core against a mock monitoring API.
//!
//! Pages, the wizard and the session run through the real HTTP client; the
//! axum server serves a fixed set of 25 monitors and records the requests.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use waterdip_common::{ClientConfig, DashboardConfig, PathLocation};
use waterdip_dashboard::wizard::{DraftEdit, MONITOR_CREATED_MESSAGE};
use waterdip_dashboard::{
    Dashboard, MemoryStorage, ModelMonitorContext, NotificationKind, Route, WizardDraft, WizardStep,
};

#[derive(Clone, Default)]
struct Mock {
    queries: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<Vec<Value>>>,
    fail_create: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    fail_register: Arc<AtomicBool>,
    list_delay_ms: Arc<AtomicU64>,
    deleted: Arc<Mutex<HashSet<String>>>,
    org_headers: Arc<Mutex<Vec<Option<String>>>>,
}

const TOTAL_MONITORS: u64 = 25;

async fn list_monitors(
    State(mock): State<Mock>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    mock.queries
        .lock()
        .push(uri.query().unwrap_or_default().to_string());
    mock.org_headers
        .lock()
        .push(headers.get("org").and_then(|v| v.to_str().ok()).map(str::to_string));

    let delay = mock.list_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u64 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
    let remaining: Vec<String> = {
        let deleted = mock.deleted.lock();
        (1..=TOTAL_MONITORS)
            .map(|n| format!("m{}", n))
            .filter(|id| !deleted.contains(id))
            .collect()
    };
    let rows: Vec<Value> = remaining
        .iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .map(|id| json!({"monitor_id": id, "monitor_name": format!("monitor {}", id)}))
        .collect();
    Json(json!({
        "monitor_list": rows,
        "meta": {"page": page, "limit": limit, "total": remaining.len()}
    }))
}

async fn delete_monitor(State(mock): State<Mock>, body: String) -> Response {
    if mock.fail_delete.load(Ordering::SeqCst) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"detail": "monitor has open incidents"})),
        )
            .into_response();
    }
    mock.deleted.lock().insert(body.clone());
    mock.bodies.lock().push(body);
    StatusCode::OK.into_response()
}

async fn register_model(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    if mock.fail_register.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "model name already exists"})),
        )
            .into_response();
    }
    Json(json!({"model_id": "model-9", "model_name": body["model_name"]})).into_response()
}

async fn create_monitor(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    if mock.fail_create.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "monitor name already exists"})),
        )
            .into_response();
    }
    mock.created.lock().push(body);
    Json(json!({"monitor_id": "new-monitor"})).into_response()
}

/// Route client logs to the test output; set RUST_LOG to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn spawn_mock() -> (SocketAddr, Mock) {
    init_tracing();
    let mock = Mock::default();
    let app = Router::new()
        .route("/v1/list.monitors", get(list_monitors))
        .route("/v1/monitor.delete", delete(delete_monitor))
        .route("/v1/monitor.create", post(create_monitor))
        .route("/v1/model.register", post(register_model))
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, mock)
}

fn dashboard(addr: SocketAddr) -> Dashboard {
    let config = DashboardConfig {
        client: ClientConfig::new(format!("http://{}", addr)),
        ..Default::default()
    };
    Dashboard::new(config, Arc::new(MemoryStorage::new())).unwrap()
}

fn filled_draft() -> WizardDraft {
    let mut draft = WizardDraft::new("Drift", "model-1", "version-1");
    draft.evaluation_metric = "psi".into();
    draft.evaluation_window = "1d".into();
    draft.threshold_direction = "Greater".into();
    draft.threshold_value = 0.2;
    draft.monitor_name = "feature drift".into();
    draft
}

// =============================================================================
// Monitor List
// =============================================================================

#[tokio::test]
async fn test_second_page_of_monitors() {
    let (addr, mock) = spawn_mock().await;
    let dashboard = dashboard(addr);
    let mut page = dashboard.monitor_list();

    page.set_page(1).unwrap();
    let state = page.settled().await.unwrap();
    assert!(state.error().is_none());

    let query = mock.queries.lock().last().cloned().unwrap();
    assert!(query.contains("page=2"));
    assert!(query.contains("limit=10"));

    let list = page.list();
    assert_eq!(list.monitor_list.len(), 10);
    assert_eq!(list.monitor_list[0].monitor_id, "m11");
    assert_eq!(list.monitor_list[9].monitor_id, "m20");
    assert_eq!(page.displayed_rows(), "11–20 of 25");
}

#[tokio::test]
async fn test_delete_removes_row_without_refetch() {
    let (addr, mock) = spawn_mock().await;
    let dashboard = dashboard(addr);
    let page = dashboard.monitor_list();

    page.refresh().unwrap();
    page.settled().await.unwrap();
    assert!(page.list().monitor_list.iter().any(|m| m.monitor_id == "m1"));

    page.delete("m1").await.unwrap();
    assert_eq!(mock.bodies.lock().as_slice(), ["m1".to_string()]);
    let list = page.list();
    assert!(list.monitor_list.iter().all(|m| m.monitor_id != "m1"));
    assert_eq!(list.meta.total, TOTAL_MONITORS - 1);
    assert_eq!(mock.queries.lock().len(), 1);

    // same key again keeps the local view
    assert!(!page.refresh().unwrap());
    assert!(page.list().monitor_list.iter().all(|m| m.monitor_id != "m1"));

    let notes = dashboard.notifier().drain();
    assert_eq!(notes.last().map(|n| n.kind), Some(NotificationKind::Info));
}

#[tokio::test]
async fn test_deleted_row_stays_gone_after_revisiting_page() {
    let (addr, mock) = spawn_mock().await;
    let dashboard = dashboard(addr);
    let mut page = dashboard.monitor_list();

    page.refresh().unwrap();
    page.settled().await.unwrap();
    page.delete("m1").await.unwrap();
    assert_eq!(page.list().monitor_list.len(), 9);

    page.set_page(1).unwrap();
    page.settled().await.unwrap();
    page.set_page(0).unwrap();
    page.settled().await.unwrap();
    assert_eq!(mock.queries.lock().len(), 3);

    // the revisited page shows what the server sent back
    let ids: Vec<String> = page
        .list()
        .monitor_list
        .iter()
        .map(|m| m.monitor_id.clone())
        .collect();
    let expected: Vec<String> = (2..=11).map(|n| format!("m{}", n)).collect();
    assert_eq!(ids, expected);
    assert_eq!(page.displayed_rows(), "1–10 of 24");
}

#[tokio::test]
async fn test_delete_while_loading_keeps_the_page() {
    let (addr, mock) = spawn_mock().await;
    mock.list_delay_ms.store(200, Ordering::SeqCst);
    let dashboard = dashboard(addr);
    let page = dashboard.monitor_list();

    page.refresh().unwrap();
    assert!(page.state().is_loading());
    page.delete("m3").await.unwrap();

    let state = page.settled().await.unwrap();
    assert!(state.error().is_none());
    let list = page.list();
    assert_eq!(list.monitor_list.len(), 10);
    assert!(list.monitor_list.iter().all(|m| m.monitor_id != "m3"));
    assert_eq!(list.monitor_list[9].monitor_id, "m11");
}

#[tokio::test]
async fn test_failed_delete_keeps_row_and_notifies() {
    let (addr, mock) = spawn_mock().await;
    mock.fail_delete.store(true, Ordering::SeqCst);
    let dashboard = dashboard(addr);
    let page = dashboard.monitor_list();

    page.refresh().unwrap();
    page.settled().await.unwrap();

    let err = page.delete("m1").await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_messages(), vec!["monitor has open incidents".to_string()]);
    assert!(page.list().monitor_list.iter().any(|m| m.monitor_id == "m1"));
    assert_eq!(page.list().meta.total, TOTAL_MONITORS);

    let notes = dashboard.notifier().drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, "Something went wrong!");
}

#[tokio::test]
async fn test_monitor_list_scoped_to_model() {
    let (addr, mock) = spawn_mock().await;
    let dashboard = dashboard(addr);
    dashboard.login("tok", "org-5").unwrap();
    dashboard
        .filters()
        .model_monitor
        .dispatch(ModelMonitorContext::new("model-1", "churn", PathLocation::Model));

    let page = dashboard.monitor_list();
    page.refresh().unwrap();
    page.settled().await.unwrap();

    let query = mock.queries.lock().last().cloned().unwrap();
    assert!(query.contains("model_id=model-1"));
    assert_eq!(
        mock.org_headers.lock().last().cloned().flatten().as_deref(),
        Some("org-5")
    );
}

// =============================================================================
// Model List
// =============================================================================

#[tokio::test]
async fn test_failed_model_create_shows_generic_message() {
    let (addr, mock) = spawn_mock().await;
    mock.fail_register.store(true, Ordering::SeqCst);
    let dashboard = dashboard(addr);
    let page = dashboard.model_list();

    let err = page.create_model("churn").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_messages(), vec!["model name already exists".to_string()]);
    assert!(!page.is_saving());

    let notes = dashboard.notifier().drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, "Something went wrong!");
}

// =============================================================================
// Monitor Wizard
// =============================================================================

#[tokio::test]
async fn test_wizard_submit_success() {
    let (addr, mock) = spawn_mock().await;
    let dashboard = dashboard(addr);
    let mut wizard = dashboard.monitor_wizard(filled_draft());

    wizard
        .edit(DraftEdit::Features(vec!["age".into(), "income".into()]))
        .unwrap();
    wizard.next().unwrap();
    wizard
        .edit(DraftEdit::Severity(waterdip_common::Severity::Low))
        .unwrap();
    wizard.next().unwrap();
    assert_eq!(wizard.step(), WizardStep::Review);

    let step = wizard.submit().await.unwrap();
    assert_eq!(step, WizardStep::Submitted);
    assert!(!wizard.is_submitting());

    let created = mock.created.lock().clone();
    assert_eq!(created.len(), 1);
    let body = &created[0];
    assert_eq!(body["monitor_type"], "DRIFT");
    assert_eq!(body["severity"], "low");
    assert_eq!(body["monitor_condition"]["threshold"]["threshold"], "gt");
    assert_eq!(
        body["monitor_condition"]["dimensions"]["features"],
        json!(["age", "income"])
    );

    let notes = dashboard.notifier().drain();
    assert_eq!(notes[0].kind, NotificationKind::Success);
    assert_eq!(notes[0].message, MONITOR_CREATED_MESSAGE);
    assert_eq!(dashboard.navigator().current(), Route::Monitors);
}

#[tokio::test]
async fn test_wizard_submit_failure_stays_on_review() {
    let (addr, mock) = spawn_mock().await;
    mock.fail_create.store(true, Ordering::SeqCst);
    let dashboard = dashboard(addr);
    dashboard.navigator().navigate(Route::MonitorCreate);

    let mut wizard = dashboard.monitor_wizard(filled_draft());
    wizard.next().unwrap();
    wizard.next().unwrap();

    let err = wizard.submit().await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.draft(), &filled_draft());

    let notes = dashboard.notifier().drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, "Something went wrong!");
    assert_eq!(dashboard.navigator().current(), Route::MonitorCreate);

    // the draft can be retried once the server accepts it
    mock.fail_create.store(false, Ordering::SeqCst);
    assert_eq!(wizard.submit().await.unwrap(), WizardStep::Submitted);
}
