//! Client authentication.
//!
//! A [`ClientAuth`] attaches credentials to each outgoing request. The
//! client calls it once per request, after every other header is set.

use base64::{engine::general_purpose, Engine as _};
use hyper::header::{HeaderValue, AUTHORIZATION};
use thiserror::Error;

use crate::http::GatewayRequest;

/// Authentication errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("credentials contain characters not allowed in a header")]
    InvalidHeaderValue,
}

/// Capability that adds credentials to an outgoing request.
pub trait ClientAuth: Send + Sync {
    fn set(&self, request: &mut GatewayRequest) -> Result<(), AuthError>;
}

/// Leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl ClientAuth for NoAuth {
    fn set(&self, _request: &mut GatewayRequest) -> Result<(), AuthError> {
        Ok(())
    }
}

/// HTTP basic authentication.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl ClientAuth for BasicAuth {
    fn set(&self, request: &mut GatewayRequest) -> Result<(), AuthError> {
        if self.username.is_empty() {
            return Err(AuthError::MissingCredentials("username"));
        }
        let encoded =
            general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        insert_authorization(request, &format!("Basic {encoded}"))
    }
}

/// Bearer token authentication.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    pub token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl ClientAuth for BearerAuth {
    fn set(&self, request: &mut GatewayRequest) -> Result<(), AuthError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredentials("token"));
        }
        insert_authorization(request, &format!("Bearer {token}"))
    }
}

fn insert_authorization(request: &mut GatewayRequest, value: &str) -> Result<(), AuthError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeaderValue)?;
    value.set_sensitive(true);
    request.headers.insert(AUTHORIZATION, value);
    Ok(())
}
