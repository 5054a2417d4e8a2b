//! Pluggable HTTP transport.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::BoxError;
use crate::http::{GatewayRequest, GatewayResponse};

/// Performs a single HTTP exchange. Redirects, timeouts, cancellation and
/// authentication are the client's job; a transport only moves bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: GatewayRequest) -> Result<GatewayResponse, BoxError>;
}

/// Default transport over hyper's pooled client. Speaks both `http` and
/// `https`; server certificates are checked against the webpki roots.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn round_trip(&self, request: GatewayRequest) -> Result<GatewayResponse, BoxError> {
        let hyper_request = request.to_hyper()?;
        let response = self.client.request(hyper_request).await?;

        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();
        debug!(status = %parts.status, bytes = body.len(), "gateway response read");

        Ok(GatewayResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}
