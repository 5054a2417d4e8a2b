//! Redirect handling policy.

use std::fmt;
use std::sync::Arc;

use hyper::StatusCode;
use url::Url;

/// Hop limit for [`RedirectPolicy::default`].
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Details of a redirect the client is about to follow.
#[derive(Debug)]
pub struct RedirectAttempt<'a> {
    /// Status of the redirect response.
    pub status: StatusCode,
    /// Where the gateway wants the client to go next.
    pub next: &'a Url,
    /// URLs already requested, oldest first.
    pub previous: &'a [Url],
}

/// Decision returned by a custom redirect policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectAction {
    /// Issue the redirected request.
    Follow,
    /// Return the redirect response to the caller unchanged.
    Stop,
    /// Abort with an error message.
    Error(String),
}

type RedirectFn = dyn Fn(&RedirectAttempt<'_>) -> RedirectAction + Send + Sync;

/// How the client reacts to 3xx responses.
#[derive(Clone)]
pub enum RedirectPolicy {
    /// Fail once the chain already holds this many requests.
    Limited(usize),
    /// Never follow; 3xx responses are returned as-is.
    None,
    /// Decide per hop.
    Custom(Arc<RedirectFn>),
}

impl RedirectPolicy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&RedirectAttempt<'_>) -> RedirectAction + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub(crate) fn check(&self, attempt: &RedirectAttempt<'_>) -> RedirectAction {
        match self {
            Self::Limited(max) => {
                if attempt.previous.len() >= *max {
                    RedirectAction::Error(format!("stopped after {max} redirects"))
                } else {
                    RedirectAction::Follow
                }
            }
            Self::None => RedirectAction::Stop,
            Self::Custom(f) => f(attempt),
        }
    }
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::Limited(DEFAULT_MAX_REDIRECTS)
    }
}

impl fmt::Debug for RedirectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(max) => f.debug_tuple("Limited").field(max).finish(),
            Self::None => f.write_str("None"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
