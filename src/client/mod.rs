//! Gateway HTTP client.
//!
//! [`GatewayClient`] owns the base gateway URL and builds every request
//! from a fresh copy of it, so no call can leak path segments or query
//! parameters into the next one. Authentication, tracing, redirects,
//! timeouts and cancellation are handled here once for all operations.

mod redirect;
mod trace;
mod transport;

pub use redirect::{RedirectAction, RedirectAttempt, RedirectPolicy, DEFAULT_MAX_REDIRECTS};
pub use trace::{format_dump, format_trace, redact_authorization, Diagnostics, SharedBuffer};
pub use transport::{HyperTransport, Transport};

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hyper::header::{
    HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT,
};
use hyper::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::auth::ClientAuth;
use crate::config::{default_user_agent, DebugOptions, DEFAULT_TIMEOUT};
use crate::context::Context;
use crate::error::ClientError;
use crate::http::{GatewayRequest, GatewayResponse};

/// API client for a single gateway.
pub struct GatewayClient {
    transport: Arc<dyn Transport>,
    auth: Arc<dyn ClientAuth>,
    gateway_url: Url,
    user_agent: String,
    timeout: Duration,
    redirect_policy: RedirectPolicy,
    debug: DebugOptions,
    diagnostics: Diagnostics,
}

impl GatewayClient {
    /// Create a client for `gateway_url`.
    ///
    /// Trailing slashes are stripped before parsing. `transport` defaults to
    /// [`HyperTransport`]. A missing or zero `timeout` becomes [`DEFAULT_TIMEOUT`].
    pub fn new(
        auth: Arc<dyn ClientAuth>,
        gateway_url: &str,
        transport: Option<Arc<dyn Transport>>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let gateway_url = parse_gateway_url(gateway_url)?;
        let transport = transport.unwrap_or_else(|| Arc::new(HyperTransport::new()));

        Ok(Self {
            transport,
            auth,
            gateway_url,
            user_agent: default_user_agent(),
            timeout: timeout
                .filter(|timeout| !timeout.is_zero())
                .unwrap_or(DEFAULT_TIMEOUT),
            redirect_policy: RedirectPolicy::default(),
            debug: DebugOptions::default(),
            diagnostics: Diagnostics::default(),
        })
    }

    /// Override the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable request tracing and/or HTTP dumps.
    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }

    /// Redirect traces and dumps away from stderr.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the redirect policy.
    pub fn set_redirect_policy(&mut self, policy: RedirectPolicy) {
        self.redirect_policy = policy;
    }

    /// Parsed base URL of the gateway.
    pub fn gateway_url(&self) -> &Url {
        &self.gateway_url
    }

    /// Base URL as a string without a trailing slash.
    pub fn gateway(&self) -> &str {
        self.gateway_url.as_str().trim_end_matches('/')
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build an authenticated request for `path` relative to the gateway.
    ///
    /// Query parameters are encoded sorted by key. A body marks the
    /// request as JSON.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Bytes>,
    ) -> Result<GatewayRequest, ClientError> {
        let mut endpoint = self.gateway_url.clone();
        endpoint.set_path(&join_path(self.gateway_url.path(), path));
        endpoint.set_query(None);
        endpoint.set_fragment(None);

        if !query.is_empty() {
            let mut pairs = query.to_vec();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            endpoint.query_pairs_mut().extend_pairs(pairs);
        }

        let mut request = GatewayRequest::new(method, endpoint);

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        if !self.user_agent.is_empty() {
            let user_agent =
                HeaderValue::from_str(&self.user_agent).map_err(hyper::http::Error::from)?;
            request.headers.insert(USER_AGENT, user_agent);
        }

        self.auth.set(&mut request)?;

        if self.debug.trace_requests {
            self.diagnostics.emit(&format_trace(&request));
        }

        Ok(request)
    }

    /// Send `request`, bounded by `ctx` and the client timeout.
    ///
    /// When the exchange fails after `ctx` was cancelled or passed its
    /// deadline, the context error is returned instead of the transport
    /// error.
    pub async fn execute(
        &self,
        ctx: &Context,
        request: GatewayRequest,
    ) -> Result<GatewayResponse, ClientError> {
        if self.debug.dump_http {
            self.diagnostics.emit(&format_dump(&request));
        }

        if let Some(cause) = ctx.err() {
            return Err(cause.into());
        }

        debug!(method = %request.method, url = %request.url, "dispatching gateway request");

        let exchange = tokio::time::timeout(self.timeout, self.follow_redirects(request));

        tokio::select! {
            biased;
            cause = ctx.done() => Err(cause.into()),
            outcome = exchange => match outcome {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(err @ ClientError::Transport { .. })) => {
                    Err(ctx.err().map(ClientError::from).unwrap_or(err))
                }
                Ok(Err(err)) => Err(err),
                Err(_) => Err(ctx
                    .err()
                    .map(ClientError::from)
                    .unwrap_or(ClientError::Timeout(self.timeout))),
            },
        }
    }

    async fn follow_redirects(
        &self,
        mut request: GatewayRequest,
    ) -> Result<GatewayResponse, ClientError> {
        let mut via: Vec<Url> = Vec::new();

        loop {
            let url = request.url.clone();
            let response = self
                .transport
                .round_trip(request.clone())
                .await
                .map_err(|source| ClientError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            debug!(status = %response.status, url = %url, "gateway responded");

            if !response.is_redirect() {
                return Ok(response);
            }
            let Some(location) = response.location() else {
                return Ok(response);
            };
            let next = url.join(location).map_err(|err| {
                ClientError::Redirect(format!("invalid redirect location {location:?}: {err}"))
            })?;

            via.push(url);
            let attempt = RedirectAttempt {
                status: response.status,
                next: &next,
                previous: &via,
            };
            match self.redirect_policy.check(&attempt) {
                RedirectAction::Follow => {}
                RedirectAction::Stop => return Ok(response),
                RedirectAction::Error(message) => {
                    warn!("redirect to {} refused: {}", next, message);
                    return Err(ClientError::Redirect(message));
                }
            }

            debug!(status = %response.status, location = %next, "following redirect");
            request = redirected_request(request, response.status, next);
        }
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("gateway_url", &self.gateway_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("redirect_policy", &self.redirect_policy)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

fn parse_gateway_url(input: &str) -> Result<Url, ClientError> {
    let trimmed = input.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| ClientError::InvalidUrl(input.to_string()))?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(ClientError::InvalidUrl(input.to_string()));
    }
    Ok(url)
}

/// Join `path` onto `base` with clean-path semantics: empty and `.`
/// segments are dropped and `..` removes the previous segment.
fn join_path(base: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

fn redirected_request(
    mut request: GatewayRequest,
    status: StatusCode,
    next: Url,
) -> GatewayRequest {
    let rewrite_to_get = matches!(
        status,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER
    ) && request.method != Method::GET
        && request.method != Method::HEAD;

    if rewrite_to_get {
        request.method = Method::GET;
        request.body = None;
        request.headers.remove(CONTENT_TYPE);
        request.headers.remove(CONTENT_LENGTH);
    }

    if request.url.host_str() != next.host_str() || request.url.port() != next.port() {
        request.headers.remove(AUTHORIZATION);
    }

    request.url = next;
    request
}
