//! Waterdip Dashboard Application State
//!
//! Holds the signed-in session and persists it as one JSON blob under the
//! key `state`, shaped `{"user":{"token":..},"org_id":..}`. The HTTP client
//! reads the same [`SessionHandle`], so login and logout take effect on the
//! next request.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use waterdip_client::{Session, SessionHandle};
use waterdip_common::{Result, WaterdipError};

/// Storage key of the persisted blob.
pub const STATE_KEY: &str = "state";

// =============================================================================
// Persisted Shape
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// The blob stored under [`STATE_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PersistedUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
}

impl PersistedState {
    /// The session this blob describes. No token means signed out.
    pub fn session(&self) -> Option<Session> {
        let token = self.user.as_ref()?.token.as_ref()?;
        if token.is_empty() {
            return None;
        }
        Some(Session::new(
            token.clone(),
            self.org_id.clone().unwrap_or_default(),
        ))
    }
}

impl From<&Session> for PersistedState {
    fn from(session: &Session) -> Self {
        Self {
            user: Some(PersistedUser {
                token: Some(session.token.clone()),
            }),
            org_id: Some(session.org_id.clone()),
        }
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Key/value store for persisted dashboard state.
pub trait StateStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file mapping keys to strings.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| WaterdipError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl StateStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// App State
// =============================================================================

/// Global application state.
#[derive(Clone)]
pub struct AppState {
    session: SessionHandle,
    storage: Arc<dyn StateStorage>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl AppState {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            session: SessionHandle::new(),
            storage,
        }
    }

    /// State with in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Build the state and restore any persisted session.
    pub fn restore(storage: Arc<dyn StateStorage>) -> Self {
        let state = Self::new(storage);
        state.load_from_storage();
        state
    }

    /// Session slot shared with the API client.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Read the persisted blob. A missing key is an empty state; an
    /// unreadable blob is logged and treated as signed out.
    pub fn load_from_storage(&self) -> PersistedState {
        let persisted = match self.read_persisted() {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "discarding unreadable persisted state");
                PersistedState::default()
            }
        };
        let session = persisted.session();
        debug!(restored = session.is_some(), "loaded persisted state");
        self.session.set(session);
        persisted
    }

    fn read_persisted(&self) -> Result<PersistedState> {
        match self.storage.get(STATE_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(PersistedState::default()),
        }
    }

    /// Write the current session to storage.
    pub fn save_to_storage(&self) -> Result<()> {
        let persisted = self
            .session
            .get()
            .map(|s| PersistedState::from(&s))
            .unwrap_or_default();
        let blob = serde_json::to_string(&persisted)?;
        self.storage.set(STATE_KEY, &blob)
    }

    /// Sign in and persist the session.
    pub fn login(&self, token: impl Into<String>, org_id: impl Into<String>) -> Result<()> {
        let session = Session::new(token, org_id);
        info!(org_id = %session.org_id, "user signed in");
        self.session.set(Some(session));
        self.save_to_storage()
    }

    /// Clear the session from memory and storage.
    pub fn logout(&self) -> Result<()> {
        info!("user signed out");
        self.session.set(None);
        self.storage.remove(STATE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_shape() {
        let persisted = PersistedState::from(&Session::new("tok", "org-1"));
        let json = serde_json::to_value(&persisted).unwrap();
        assert_eq!(json, serde_json::json!({"user": {"token": "tok"}, "org_id": "org-1"}));
    }

    #[test]
    fn test_session_requires_token() {
        let persisted: PersistedState = serde_json::from_str(r#"{"org_id":"org-1"}"#).unwrap();
        assert!(persisted.session().is_none());
        let persisted: PersistedState =
            serde_json::from_str(r#"{"user":{"token":""},"org_id":"org-1"}"#).unwrap();
        assert!(persisted.session().is_none());
        let persisted: PersistedState = serde_json::from_str(r#"{"user":{"token":"t"}}"#).unwrap();
        assert_eq!(persisted.session(), Some(Session::new("t", "")));
    }

    #[test]
    fn test_login_logout_round_trip() {
        let storage = Arc::new(MemoryStorage::new());
        let state = AppState::new(storage.clone());
        assert!(!state.is_authenticated());

        state.login("tok-1", "org-7").unwrap();
        assert!(state.is_authenticated());

        let restored = AppState::restore(storage.clone());
        assert_eq!(restored.session().get(), Some(Session::new("tok-1", "org-7")));

        state.logout().unwrap();
        assert!(!state.is_authenticated());
        assert!(storage.get(STATE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_means_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STATE_KEY, "{not json").unwrap();
        let state = AppState::restore(storage);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = AppState::new(Arc::new(FileStorage::new(&path)));
        state.login("file-token", "org-2").unwrap();
        assert!(path.exists());

        let restored = AppState::restore(Arc::new(FileStorage::new(&path)));
        assert_eq!(restored.session().get(), Some(Session::new("file-token", "org-2")));

        restored.logout().unwrap();
        let storage = FileStorage::new(&path);
        assert!(storage.get(STATE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert!(storage.get(STATE_KEY).unwrap().is_none());
        storage.remove(STATE_KEY).unwrap();
    }
}
