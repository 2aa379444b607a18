//! HTTP transport abstraction for the Pony Town client.
//!
//! The [`Transport`] trait performs a single HTTP GET and hands back the
//! status code and body text. Everything the API needs on top of plain HTTP
//! (headers, status handling, base64, decoding) lives in
//! [`PonyTownClient`](crate::client::PonyTownClient), so an implementation
//! only has to shuttle bytes.
//!
//! TLS, cookies, redirects and connection pooling are the implementation's
//! business; this crate never sees them.
//!
//! # Implementing a Transport
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use ponytown_client::error::PonyTownError;
//! use ponytown_client::transport::{HttpRequest, HttpResponse, Transport};
//!
//! struct MyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     async fn get(&self, request: HttpRequest) -> Result<HttpResponse, PonyTownError> {
//!         // Issue `GET request.url` with `request.headers` using your HTTP stack.
//!         Ok(HttpResponse::new(200, "UAAA"))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::PonyTownError;

/// An outgoing GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL.
    pub url: String,
    /// Extra request headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a request for `url` with no headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request/response HTTP channel to the game's API.
///
/// Requests are issued through `&self`, so a transport is expected to be
/// shareable (most HTTP clients are internally reference counted).
///
/// # Object Safety
///
/// This trait is object-safe; `Box<dyn Transport>` works for dynamic dispatch.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Perform a GET request.
    ///
    /// Non-2xx responses are not errors at this level: return them as an
    /// [`HttpResponse`] so the client can read the error envelope.
    ///
    /// # Errors
    ///
    /// Returns [`PonyTownError::Transport`] if no response was received
    /// (DNS failure, connection reset, TLS error, ...).
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, PonyTownError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, PonyTownError> {
        (**self).get(request).await
    }
}
