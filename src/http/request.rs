//! Outgoing gateway request.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Method, Request};
use url::Url;

use crate::error::ClientError;

/// A fully-qualified request against the gateway.
///
/// The body is held as [`Bytes`], so tracing, dumping and redirect replay
/// can all read it without consuming what is sent on the wire.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
}

impl GatewayRequest {
    /// Create a request without headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a header value as a string.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the body as text if present.
    pub fn text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).to_string())
    }

    /// Path and query as they appear on the HTTP request line.
    pub fn request_target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// Convert into a hyper request for dispatch.
    pub fn to_hyper(&self) -> Result<Request<Full<Bytes>>, ClientError> {
        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(self.url.as_str());

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let body = self.body.clone().unwrap_or_default();
        Ok(builder.body(Full::new(body))?)
    }
}
