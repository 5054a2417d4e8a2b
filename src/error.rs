//! Error types for gateway operations.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::auth::AuthError;
use crate::context::ContextError;

/// Boxed error returned by transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the gateway client and the operations built on it.
///
/// Nothing here is retried internally; every failure is returned to the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error("unable to set authentication: {0}")]
    Authentication(#[from] AuthError),

    #[error("cannot connect to gateway on URL: {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Redirect(String),

    #[error("server returned unexpected status code: {status} - {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("no such function: {0}")]
    NoSuchFunction(String),

    #[error("invalid function name: {0:?}")]
    InvalidFunctionName(String),

    #[error("{0}")]
    PartialDeployFailure(DeployFailures),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] hyper::http::Error),

    #[error("cannot decode gateway response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Status code carried by the error, if the gateway answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::NoSuchFunction(_) => Some(404),
            _ => None,
        }
    }
}

/// A single function that the gateway refused to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployFailure {
    pub function: String,
    pub status: u16,
}

/// Every failed deployment from one batch, sorted by function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployFailures(pub Vec<DeployFailure>);

impl DeployFailures {
    pub fn iter(&self) -> impl Iterator<Item = &DeployFailure> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DeployFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "Function '{}' failed to deploy with status code: {}",
                failure.function, failure.status
            )?;
        }
        Ok(())
    }
}
