//! Waterdip Error - Unified Error Types
//!
//! Error handling for every dashboard operation. Separates failures where the
//! API could not be reached from failures the API reported, so pages can choose
//! between a generic "reload" hint and the server's own messages.
//!
//! Key Features:
//! - Transport vs server error classification
//! - Server error bodies carried verbatim
//! - User-facing message rendering for notifications
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when no response could be obtained from the API.
pub const CONNECTION_FAILED_MESSAGE: &str = "Something went wrong!! Please reload.";

/// Message shown when a mutation fails.
pub const MUTATION_FAILED_MESSAGE: &str = "Something went wrong!";

// =============================================================================
// Server Error Detail
// =============================================================================

/// A single entry of an error body returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorDetail {
    pub msg: String,
}

impl ServerErrorDetail {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all Waterdip dashboard operations.
///
/// Cloneable so query and mutation handles can keep the last failure while
/// also returning it to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaterdipError {
    // Transport errors
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    // API errors
    #[error("server error [{status}]: {}", join_messages(.errors))]
    Server {
        status: u16,
        errors: Vec<ServerErrorDetail>,
    },

    #[error("decode error: {0}")]
    Decode(String),

    // Local errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

fn join_messages(errors: &[ServerErrorDetail]) -> String {
    if errors.is_empty() {
        return "no details".to_string();
    }
    errors
        .iter()
        .map(|e| e.msg.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for Waterdip operations.
pub type Result<T> = std::result::Result<T, WaterdipError>;

// =============================================================================
// Error Classification
// =============================================================================

impl WaterdipError {
    /// Build the error raised when no response was received.
    pub fn connection_failed() -> Self {
        WaterdipError::ConnectionFailed(CONNECTION_FAILED_MESSAGE.to_string())
    }

    /// Returns true if the API could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, WaterdipError::ConnectionFailed(_))
    }

    /// Returns true if the API answered with an error body.
    pub fn is_server(&self) -> bool {
        matches!(self, WaterdipError::Server { .. })
    }

    /// HTTP status of a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            WaterdipError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Messages to present to the user.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            WaterdipError::ConnectionFailed(msg) => vec![msg.clone()],
            WaterdipError::Server { errors, .. } if !errors.is_empty() => {
                errors.iter().map(|e| e.msg.clone()).collect()
            }
            WaterdipError::Server { .. } => vec![MUTATION_FAILED_MESSAGE.to_string()],
            other => vec![other.to_string()],
        }
    }
}

impl From<serde_json::Error> for WaterdipError {
    fn from(err: serde_json::Error) -> Self {
        WaterdipError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for WaterdipError {
    fn from(err: std::io::Error) -> Self {
        WaterdipError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for WaterdipError {
    fn from(err: toml::de::Error) -> Self {
        WaterdipError::Configuration(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_message() {
        let err = WaterdipError::connection_failed();
        assert!(err.is_transport());
        assert!(!err.is_server());
        assert_eq!(err.user_messages(), vec![CONNECTION_FAILED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_server_error_display() {
        let err = WaterdipError::Server {
            status: 422,
            errors: vec![
                ServerErrorDetail::new("model_id is required"),
                ServerErrorDetail::new("page must be positive"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "server error [422]: model_id is required; page must be positive"
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.user_messages().len(), 2);
    }

    #[test]
    fn test_server_error_without_details() {
        let err = WaterdipError::Server {
            status: 500,
            errors: vec![],
        };
        assert_eq!(err.to_string(), "server error [500]: no details");
        assert_eq!(err.user_messages(), vec![MUTATION_FAILED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_decode_from_serde() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("nope");
        let err: WaterdipError = parse.unwrap_err().into();
        assert!(matches!(err, WaterdipError::Decode(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_io_error_is_cloneable() {
        let err: WaterdipError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        let copy = err.clone();
        assert_eq!(err, copy);
        assert_eq!(copy.to_string(), "IO error: gone");
    }
}
