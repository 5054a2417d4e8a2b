//! Client configuration.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::ClientAuth;
use crate::client::GatewayClient;
use crate::error::ClientError;

/// Gateway used when neither a flag nor `OPENFAAS_URL` provides one.
pub const DEFAULT_GATEWAY: &str = "http://127.0.0.1:8080";

/// Timeout applied to every exchange unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_GATEWAY: &str = "OPENFAAS_URL";
pub const ENV_DEBUG: &str = "FAAS_DEBUG";
pub const ENV_DUMP_HTTP: &str = "OPENFAAS_DUMP_HTTP";

/// Default `User-Agent` for gateway requests.
pub fn default_user_agent() -> String {
    format!("faasctl/{}", env!("CARGO_PKG_VERSION"))
}

/// Opt-in request tracing, resolved once when the client is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugOptions {
    /// Print method, URL, headers (credentials redacted) and body of each request.
    pub trace_requests: bool,
    /// Print each raw HTTP request, including its body, before it is sent.
    pub dump_http: bool,
}

impl DebugOptions {
    /// Read `FAAS_DEBUG=1` and `OPENFAAS_DUMP_HTTP=true` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            trace_requests: lookup(ENV_DEBUG).as_deref() == Some("1"),
            dump_http: lookup(ENV_DUMP_HTTP).as_deref() == Some("true"),
        }
    }
}

/// Configuration for a [`GatewayClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway base URL.
    pub gateway: String,
    /// Request timeout. Zero selects [`DEFAULT_TIMEOUT`].
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Request tracing switches.
    pub debug: DebugOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway: DEFAULT_GATEWAY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            debug: DebugOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `OPENFAAS_URL`, `FAAS_DEBUG` and `OPENFAAS_DUMP_HTTP`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(gateway) = std::env::var(ENV_GATEWAY) {
            if !gateway.trim().is_empty() {
                config.gateway = gateway.trim().to_string();
            }
        }
        config.debug = DebugOptions::from_env();
        config
    }

    /// Set the gateway URL.
    pub fn gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the tracing switches.
    pub fn debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }

    /// Effective timeout: the configured one, or [`DEFAULT_TIMEOUT`] when zero.
    pub fn timeout_duration(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Build a client over the default transport.
    pub fn build(&self, auth: Arc<dyn ClientAuth>) -> Result<GatewayClient, ClientError> {
        Ok(
            GatewayClient::new(auth, &self.gateway, None, Some(self.timeout_duration()))?
                .with_user_agent(self.user_agent.clone())
                .with_debug(self.debug),
        )
    }
}
