//! Waterdip Dashboard Routes
//!
//! Dashboard locations and the navigator pages use to move between them.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub const ROOT_AUTH: &str = "/auth";
pub const ROOT_DASHBOARD: &str = "/app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Models,
    ModelDetails {
        model_id: String,
        tab: Option<String>,
        version_id: Option<String>,
    },
    Monitors,
    MonitorCreate,
    Alerts,
}

impl Route {
    pub fn model_details(model_id: impl Into<String>) -> Self {
        Route::ModelDetails {
            model_id: model_id.into(),
            tab: None,
            version_id: None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => format!("{}/login", ROOT_AUTH),
            Route::Models => format!("{}/models", ROOT_DASHBOARD),
            Route::ModelDetails {
                model_id,
                tab,
                version_id,
            } => {
                let mut path = format!("{}/models/{}/", ROOT_DASHBOARD, model_id);
                if let Some(tab) = tab {
                    path.push_str(tab);
                }
                if let Some(version_id) = version_id {
                    path.push_str("?version_id=");
                    path.push_str(version_id);
                }
                path
            }
            Route::Monitors => format!("{}/monitors", ROOT_DASHBOARD),
            Route::MonitorCreate => format!("{}/monitors/create", ROOT_DASHBOARD),
            Route::Alerts => format!("{}/alerts", ROOT_DASHBOARD),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Current location, observable by the renderer.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Models)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        let (tx, _rx) = watch::channel(start);
        Self { tx: Arc::new(tx) }
    }

    pub fn navigate(&self, route: Route) {
        debug!(path = %route, "navigate");
        self.tx.send_replace(route);
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Monitors.path(), "/app/monitors");
        assert_eq!(Route::MonitorCreate.path(), "/app/monitors/create");
        assert_eq!(Route::Login.path(), "/auth/login");
        assert_eq!(Route::model_details("m-1").path(), "/app/models/m-1/");
        let route = Route::ModelDetails {
            model_id: "m-1".into(),
            tab: Some("drift".into()),
            version_id: Some("v-2".into()),
        };
        assert_eq!(route.to_string(), "/app/models/m-1/drift?version_id=v-2");
    }

    #[test]
    fn test_navigator_tracks_current_route() {
        let navigator = Navigator::default();
        let view = navigator.clone();
        navigator.navigate(Route::Alerts);
        assert_eq!(view.current(), Route::Alerts);
    }
}
