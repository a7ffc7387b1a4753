//! Waterdip Config - Configuration Structures
//!
//! Configuration for the API client and the dashboard core. Supports loading
//! from TOML files, environment variable overrides, and programmatic
//! construction with development defaults.
//!
//! Key Features:
//! - API base URL and request settings
//! - Default table page size
//! - Location of the persisted session blob
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::error::{Result, WaterdipError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the API base URL.
pub const ENV_API_URL: &str = "WATERDIP_API_URL";

/// Environment variable that overrides the session state file.
pub const ENV_STATE_FILE: &str = "WATERDIP_STATE_FILE";

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the HTTP client wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every `/v1/` endpoint is appended to.
    pub base_url: String,
    /// Optional per-request timeout. `None` leaves requests unbounded.
    #[serde(with = "optional_secs")]
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4422".to_string(),
            request_timeout: None,
            user_agent: format!("waterdip-dashboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Base URL with any trailing slash removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check the configuration for obvious mistakes.
    pub fn validate(&self) -> Result<()> {
        let base = self.normalized_base_url();
        if base.is_empty() {
            return Err(WaterdipError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(WaterdipError::Configuration(format!(
                "base_url must start with http:// or https://, got {}",
                base
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Dashboard Configuration
// =============================================================================

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub client: ClientConfig,
    pub default_page_size: u32,
    /// File holding the serialized session blob.
    pub state_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            default_page_size: 10,
            state_file: PathBuf::from("./waterdip-state.json"),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.client.validate()?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `WATERDIP_API_URL` and `WATERDIP_STATE_FILE` when set.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                self.client.base_url = url;
            }
        }
        if let Ok(path) = std::env::var(ENV_STATE_FILE) {
            if !path.is_empty() {
                self.state_file = PathBuf::from(path);
            }
        }
        self.client.validate()?;
        Ok(self)
    }
}

mod optional_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert!(config.client.request_timeout.is_none());
        assert!(config.client.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = DashboardConfig::from_toml(
            r#"
            default_page_size = 25

            [client]
            base_url = "https://api.example.com/"
            request_timeout = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.client.normalized_base_url(), "https://api.example.com");
        assert_eq!(config.client.request_timeout, Some(Duration::from_secs(30)));
        assert!(config.client.user_agent.starts_with("waterdip-dashboard/"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = DashboardConfig::from_toml(
            r#"
            [client]
            base_url = "ftp://nowhere"
            "#,
        );
        assert!(matches!(result, Err(WaterdipError::Configuration(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "state_file = \"/tmp/wd-state.json\"").unwrap();
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.state_file, PathBuf::from("/tmp/wd-state.json"));
    }
}
