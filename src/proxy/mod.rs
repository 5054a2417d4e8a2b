//! Gateway operations built on [`GatewayClient`](crate::client::GatewayClient).
//!
//! Each operation is a single request/response round trip. Nothing here
//! retries; callers decide what to do with a failure.

mod delete;
mod deploy;
mod describe;
mod list;
mod namespaces;
mod report;

pub use deploy::{DeployMethod, DeployResponse};
pub use report::{is_bad_status_code, DeployReport};

use crate::error::ClientError;
use crate::http::GatewayResponse;

pub const FUNCTIONS_PATH: &str = "/system/functions";
pub const FUNCTION_PATH: &str = "/system/function";
pub const NAMESPACES_PATH: &str = "/system/namespaces";

/// Query for an optional namespace; empty namespaces are omitted.
fn namespace_query(namespace: Option<&str>) -> Vec<(&str, &str)> {
    match namespace.map(str::trim).filter(|ns| !ns.is_empty()) {
        Some(ns) => vec![("namespace", ns)],
        None => Vec::new(),
    }
}

/// `name` as a single path segment. Names that would step out of the
/// segment are refused; `%` is escaped so the URL parser cannot decode a
/// dot segment out of it, and the rest is encoded by [`url::Url::set_path`].
fn function_segment(name: &str) -> Result<String, ClientError> {
    if matches!(name, "" | "." | "..") || name.contains(['/', '\\']) {
        return Err(ClientError::InvalidFunctionName(name.to_string()));
    }
    Ok(name.replace('%', "%25"))
}

fn unexpected_status(response: &GatewayResponse) -> ClientError {
    ClientError::UnexpectedStatus {
        status: response.status_code(),
        body: response.text(),
    }
}

/// Gateway URLs used to invoke a function synchronously and asynchronously.
pub fn function_urls(gateway: &str, name: &str, namespace: Option<&str>) -> (String, String) {
    let gateway = gateway.trim_end_matches('/');
    let target = match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) => format!("{name}.{ns}"),
        None => name.to_string(),
    };
    (
        format!("{gateway}/function/{target}"),
        format!("{gateway}/async-function/{target}"),
    )
}
