//! Gateway response with a fully-read body.

use bytes::Bytes;
use hyper::header::HeaderMap;
use hyper::StatusCode;

/// Response returned by a [`Transport`](crate::client::Transport).
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl GatewayResponse {
    /// Create a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get the body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Value of the `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(hyper::header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Whether the status is a redirect this client knows how to follow.
    pub fn is_redirect(&self) -> bool {
        matches!(
            self.status,
            StatusCode::MOVED_PERMANENTLY
                | StatusCode::FOUND
                | StatusCode::SEE_OTHER
                | StatusCode::TEMPORARY_REDIRECT
                | StatusCode::PERMANENT_REDIRECT
        )
    }
}
