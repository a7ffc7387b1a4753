//! Waterdip Client HTTP Wrapper
//!
//! Every call to the monitoring API goes through [`HttpClient`]. It prefixes
//! the configured base URL, attaches the session headers and normalizes
//! failures into [`WaterdipError`]:
//!
//! - no response at all becomes `ConnectionFailed` with a generic reload hint;
//! - a non-2xx response becomes `Server` carrying the parsed error body;
//! - anything else is passed through with its status and headers.
//!
//! There is no retry and no backoff: one request per call.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::endpoints::make_url;
use crate::session::SessionHandle;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use waterdip_common::{ClientConfig, Result, ServerErrorDetail, WaterdipError};

/// Header carrying the organization id.
pub const ORG_HEADER: &str = "Org";

// =============================================================================
// API Response
// =============================================================================

/// A decoded payload together with the response metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub headers: HeaderMap,
}

impl<T> ApiResponse<T> {
    /// Transform the payload, keeping status and headers.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Query string used by calls that take no parameters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

// =============================================================================
// HTTP Client
// =============================================================================

/// Thin wrapper around `reqwest::Client` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
    session: SessionHandle,
}

impl HttpClient {
    /// Create a client from configuration and a shared session slot.
    pub fn new(config: &ClientConfig, session: SessionHandle) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| WaterdipError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: config.normalized_base_url().to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Full URL of an endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        make_url(&self.base_url, endpoint)
    }

    /// Build a request with the session headers attached.
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        debug!(%method, %url, "api request");

        let mut req = self.http.request(method, url);
        if let Some(session) = self.session.get() {
            if !session.token.is_empty() {
                req = req
                    .header(AUTHORIZATION, format!("Bearer {}", session.token))
                    .header(ORG_HEADER, session.org_id);
            }
        }
        req
    }

    /// GET with query parameters.
    pub async fn get<T, Q>(&self, endpoint: &str, query: &Q) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, endpoint).query(query);
        self.send(req).await
    }

    /// POST a JSON body with query parameters.
    pub async fn post<T, Q, B>(&self, endpoint: &str, query: &Q, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::POST, endpoint).query(query).json(body);
        self.send(req).await
    }

    /// POST a raw text body, sent verbatim.
    pub async fn post_text<T>(&self, endpoint: &str, body: impl Into<String>) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let req = self
            .request(Method::POST, endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.into());
        self.send(req).await
    }

    /// DELETE with a raw text body, sent verbatim.
    pub async fn delete_text<T>(&self, endpoint: &str, body: impl Into<String>) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let req = self
            .request(Method::DELETE, endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.into());
        self.send(req).await
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = match req.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "api request received no response");
                return Err(WaterdipError::connection_failed());
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|err| {
            warn!(error = %err, "api response body could not be read");
            WaterdipError::connection_failed()
        })?;

        if !status.is_success() {
            let errors = parse_error_body(&body);
            warn!(status = status.as_u16(), errors = errors.len(), "api returned an error");
            return Err(WaterdipError::Server {
                status: status.as_u16(),
                errors,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "api response");
        let data = decode_body(&body)?;
        Ok(ApiResponse {
            data,
            status: status.as_u16(),
            headers,
        })
    }
}

// =============================================================================
// Body Helpers
// =============================================================================

/// Decode a success body. An empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let trimmed = trim_ascii(body);
    if trimmed.is_empty() {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(trimmed)?)
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|i| i + 1)
        .unwrap_or(start);
    &bytes[start..end]
}

/// Extract the error entries of a failed response.
///
/// Understands `{"errors": [{"msg": ..}]}`, FastAPI's `{"detail": ..}` (string
/// or list of `{msg}`), `{"message": ..}` / `{"error": ..}`, and falls back to
/// the raw text.
pub fn parse_error_body(body: &[u8]) -> Vec<ServerErrorDetail> {
    let body = trim_ascii(body);
    if body.is_empty() {
        return Vec::new();
    }

    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => {
            return vec![ServerErrorDetail::new(
                String::from_utf8_lossy(body).into_owned(),
            )]
        }
    };

    for key in ["errors", "detail"] {
        if let Some(entry) = value.get(key) {
            let details = details_from_value(entry);
            if !details.is_empty() {
                return details;
            }
        }
    }
    for key in ["message", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return vec![ServerErrorDetail::new(msg)];
        }
    }
    details_from_value(&value)
}

fn details_from_value(value: &serde_json::Value) -> Vec<ServerErrorDetail> {
    match value {
        serde_json::Value::String(s) => vec![ServerErrorDetail::new(s.clone())],
        serde_json::Value::Array(items) => items.iter().flat_map(details_from_value).collect(),
        serde_json::Value::Object(map) => match map.get("msg").and_then(|m| m.as_str()) {
            Some(msg) => vec![ServerErrorDetail::new(msg)],
            None => vec![ServerErrorDetail::new(value.to_string())],
        },
        serde_json::Value::Null => Vec::new(),
        other => vec![ServerErrorDetail::new(other.to_string())],
    }
}
