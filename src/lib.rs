//! # faasctl - FaaS Gateway Client
//!
//! `faasctl` talks to a function-as-a-service gateway over its HTTP API:
//! it deploys, lists, describes and removes functions and renders the
//! gateway's JSON answers as text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     commands (deploy, list, ...)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 proxy operations + DeployReport                     │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         GatewayClient                               │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌─────────────┐   │
//! │  │ ClientAuth │  │  Tracing   │  │ Redirects  │  │  Transport  │   │
//! │  └────────────┘  └────────────┘  └────────────┘  └─────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//!                               Gateway
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use faasctl::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClientError> {
//!     let client = GatewayClient::new(
//!         Arc::new(BasicAuth::new("admin", "secret")),
//!         "http://127.0.0.1:8080",
//!         None,
//!         None,
//!     )?;
//!
//!     let ctx = Context::background();
//!     for function in client.list_functions(&ctx, None).await? {
//!         println!("{} ({} replicas)", function.name, function.replicas);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Debugging
//!
//! Set `FAAS_DEBUG=1` to trace every request (credentials redacted) or
//! `OPENFAAS_DUMP_HTTP=true` to dump each raw request before it is sent.
//! Both are read once, through [`ClientConfig::from_env`].

pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod proxy;
pub mod types;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::auth::{BasicAuth, BearerAuth, ClientAuth, NoAuth};
    pub use crate::client::{GatewayClient, RedirectPolicy, Transport};
    pub use crate::config::{ClientConfig, DebugOptions};
    pub use crate::context::Context;
    pub use crate::error::ClientError;
    pub use crate::proxy::{DeployMethod, DeployReport};
    pub use crate::types::{FunctionDeployment, FunctionStatus};
}

// Re-export for convenience
pub use client::GatewayClient;
pub use config::ClientConfig;
pub use context::Context;
pub use error::ClientError;
