//! Waterdip Client - Monitoring API Client SDK
//!
//! Native Rust client for the Waterdip model-observability API. Each resource
//! gets one fetch operation that issues a single request and normalizes the
//! loosely shaped JSON into a fully defaulted view model.
//!
//! Key Features:
//! - Session-aware HTTP wrapper with uniform error normalization
//! - One normalization function per resource, no field left unset
//! - Mutation handles tracking loading/error state
//! - Keyed, cancellable query handles for page-level fetching
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod de;
pub mod endpoints;
pub mod http;
pub mod meta;
pub mod mutation;
pub mod query;
pub mod resources;
pub mod session;

pub use http::{ApiResponse, HttpClient};
pub use meta::{ListMeta, ListParams};
pub use mutation::Mutation;
pub use query::{Query, QueryKey, QueryState, QueryStatus};
pub use session::{Session, SessionHandle};

use waterdip_common::{ClientConfig, Result};

/// The main client for the monitoring API.
///
/// Cheap to clone; clones share the connection pool and the session slot.
#[derive(Debug, Clone)]
pub struct WaterdipClient {
    http: HttpClient,
}

impl WaterdipClient {
    /// Create a client with the given configuration and session slot.
    pub fn new(config: &ClientConfig, session: SessionHandle) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, session)?,
        })
    }

    /// Create an unauthenticated client for a base URL.
    pub fn connect(base_url: &str) -> Result<Self> {
        Self::new(&ClientConfig::new(base_url), SessionHandle::new())
    }

    /// The underlying HTTP wrapper.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The session slot requests read their headers from.
    pub fn session(&self) -> &SessionHandle {
        self.http.session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_trims_base_url() {
        let client = WaterdipClient::connect("http://localhost:4422/").expect("valid url");
        assert_eq!(client.http().base_url(), "http://localhost:4422");
        assert_eq!(
            client.http().url(endpoints::LIST_MODELS),
            "http://localhost:4422/v1/list.models"
        );
        assert!(!client.session().is_authenticated());
    }
}
