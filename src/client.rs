//! Async client for the Pony Town status API.
//!
//! [`PonyTownClient`] is a thin wrapper over a [`Transport`]: it builds the
//! request, turns HTTP and JSON error envelopes into [`PonyTownError`]s, and
//! hands the base64 body to the status decoder with the configured
//! [`ProtocolScope`].
//!
//! # Example
//!
//! ```rust,ignore
//! let transport = MyHttpTransport::new();
//! let config = ClientConfig::new().with_api_version("2c3b5f1a");
//! let client = PonyTownClient::new(transport, config);
//!
//! let status = client.status().await?;
//! for server in &status.servers {
//!     println!("{server}");
//! }
//! ```

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::decoder::decode_status_base64;
use crate::error::{PonyTownError, Result};
use crate::scope::ProtocolScope;
use crate::status::GameStatus;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Name of the header carrying the API version token.
pub const API_VERSION_HEADER: &str = "api-version";

/// Site root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://pony.town/";

/// Status endpoint, relative to the base URL.
pub const STATUS_PATH: &str = "api2/game/status";

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback message when an error response carries no usable envelope.
const NO_ERROR_MESSAGE: &str = "No error message provided";

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for a [`PonyTownClient`].
///
/// # Example
///
/// ```
/// use ponytown_client::client::ClientConfig;
/// use ponytown_client::scope::ProtocolScope;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_scope(ProtocolScope::legacy())
///     .with_api_version("2c3b5f1a")
///     .with_request_timeout(Duration::from_secs(3));
/// assert_eq!(config.effective_api_version(), Some("2c3b5f1a"));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root, with a trailing slash. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// API version token sent in the [`API_VERSION_HEADER`] header.
    ///
    /// When `None`, the scope's default API version is used; when both are
    /// `None` the header is omitted.
    pub api_version: Option<String>,
    /// Wire revision used to decode the status blob.
    pub scope: ProtocolScope,
    /// Per-request timeout. `None` waits indefinitely.
    ///
    /// Defaults to **10 seconds**.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: None,
            scope: ProtocolScope::default(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Set the site root. A trailing slash is appended if missing.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Set the API version token, overriding the scope's preset.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set the wire revision used for decoding.
    #[must_use]
    pub fn with_scope(mut self, scope: ProtocolScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Wait for responses indefinitely.
    #[must_use]
    pub fn without_request_timeout(mut self) -> Self {
        self.request_timeout = None;
        self
    }

    /// The API version actually sent: explicit setting first, then the scope's preset.
    pub fn effective_api_version(&self) -> Option<&str> {
        self.api_version
            .as_deref()
            .or_else(|| self.scope.default_api_version())
    }

    /// Absolute URL of the status endpoint.
    pub fn status_url(&self) -> String {
        format!("{}{}", self.base_url, STATUS_PATH)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON body the API returns alongside error statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the Pony Town API.
///
/// All request methods take `&self`; wrap the client in an `Arc` to share it
/// between tasks.
pub struct PonyTownClient<T: Transport> {
    transport: T,
    status_url: String,
    scope: ProtocolScope,
    request_timeout: Option<Duration>,
    api_version: RwLock<Option<String>>,
}

impl<T: Transport> PonyTownClient<T> {
    /// Create a client over `transport`.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let api_version = config.effective_api_version().map(str::to_owned);
        Self {
            transport,
            status_url: config.status_url(),
            scope: config.scope,
            request_timeout: config.request_timeout,
            api_version: RwLock::new(api_version),
        }
    }

    /// Fetch and decode the current game status.
    ///
    /// # Errors
    ///
    /// - [`PonyTownError::Transport`] / [`PonyTownError::Timeout`] if no response arrived
    /// - [`PonyTownError::Forbidden`] on HTTP 403
    /// - [`PonyTownError::Api`] on any other non-2xx status
    /// - [`PonyTownError::Base64`] / [`PonyTownError::Decode`] for a malformed body
    pub async fn status(&self) -> Result<GameStatus> {
        let response = self.get(self.status_url.clone()).await?;
        let body = check_response(response)?;
        let status = decode_status_base64(&body, &self.scope)?;
        debug!(
            servers = status.servers.len(),
            event = status.event.as_deref().unwrap_or(""),
            "decoded game status"
        );
        Ok(status)
    }

    /// Returns the API version token currently sent with requests.
    pub async fn api_version(&self) -> Option<String> {
        self.api_version.read().await.clone()
    }

    /// Replace the API version token sent with subsequent requests.
    pub async fn set_api_version(&self, api_version: Option<String>) {
        *self.api_version.write().await = api_version;
    }

    /// The wire revision used for decoding.
    pub fn scope(&self) -> &ProtocolScope {
        &self.scope
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn get(&self, url: String) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(url);
        if let Some(version) = self.api_version.read().await.as_deref() {
            request = request.with_header(API_VERSION_HEADER, version);
        }
        debug!(url = %request.url, "GET");

        let fut = self.transport.get(request);
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| PonyTownError::Timeout)?,
            None => fut.await,
        }
    }
}

impl<T: Transport> std::fmt::Debug for PonyTownClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PonyTownClient")
            .field("status_url", &self.status_url)
            .field("scope", &self.scope)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Map a raw response to its body, or to the error it describes.
fn check_response(response: HttpResponse) -> Result<String> {
    if response.is_success() {
        return Ok(response.body);
    }
    warn!(status = response.status, "request failed");
    if response.status == 403 {
        return Err(PonyTownError::Forbidden);
    }
    let message = serde_json::from_str::<ErrorEnvelope>(&response.body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string());
    Err(PonyTownError::Api {
        status: response.status,
        message,
    })
}
