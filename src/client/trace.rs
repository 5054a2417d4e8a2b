//! Request tracing for `FAAS_DEBUG` and `OPENFAAS_DUMP_HTTP`.

use std::fmt;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::{Arc, Mutex};

use hyper::header::AUTHORIZATION;
use tracing::warn;

use crate::http::GatewayRequest;

/// Where traces and dumps are written.
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<Mutex<dyn Write + Send>>,
}

impl Diagnostics {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(writer)),
        }
    }

    /// Write to the process's standard error.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// Capture into a shared in-memory buffer.
    pub fn buffer() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    pub(crate) fn emit(&self, text: &str) {
        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = sink.write_all(text.as_bytes()).and_then(|_| sink.flush()) {
            warn!("failed to write request trace: {}", err);
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Diagnostics")
    }
}

/// Cloneable in-memory writer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = match self.0.lock() {
            Ok(bytes) => bytes,
            Err(poisoned) => poisoned.into_inner(),
        };
        String::from_utf8_lossy(&bytes).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut bytes = match self.0.lock() {
            Ok(bytes) => bytes,
            Err(poisoned) => poisoned.into_inner(),
        };
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reduce an `Authorization` value to its scheme.
pub fn redact_authorization(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "NOT_SET".to_string();
    };
    match value.split_once(' ') {
        Some((scheme @ ("Basic" | "Bearer"), _)) => format!("{scheme} REDACTED"),
        _ => "REDACTED".to_string(),
    }
}

/// Method, URL, headers and body of a request, credentials redacted.
pub fn format_trace(request: &GatewayRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", request.method, request.url);

    for (name, value) in &request.headers {
        if *name == AUTHORIZATION {
            let _ = writeln!(out, "{}: {}", name, redact_authorization(value.to_str().ok()));
        } else {
            let _ = writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
        }
    }

    if let Some(body) = request.text().filter(|body| !body.is_empty()) {
        let _ = writeln!(out, "{body}");
    }
    out
}

/// Raw HTTP/1.1 rendering of a request, body included.
pub fn format_dump(request: &GatewayRequest) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} {} HTTP/1.1\r\n", request.method, request.request_target());
    if let Some(host) = request.url.host_str() {
        match request.url.port() {
            Some(port) => {
                let _ = write!(out, "Host: {host}:{port}\r\n");
            }
            None => {
                let _ = write!(out, "Host: {host}\r\n");
            }
        }
    }
    for (name, value) in &request.headers {
        let _ = write!(out, "{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes()));
    }
    out.push_str("\r\n");
    if let Some(body) = request.text() {
        out.push_str(&body);
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderValue, USER_AGENT};
    use hyper::Method;
    use url::Url;

    fn request() -> GatewayRequest {
        GatewayRequest::new(
            Method::PUT,
            Url::parse("http://127.0.0.1:8080/system/functions?namespace=dev").unwrap(),
        )
        .header(USER_AGENT, HeaderValue::from_static("faasctl/test"))
        .body(r#"{"service":"figlet"}"#)
    }

    #[test]
    fn test_redact_basic() {
        assert_eq!(redact_authorization(Some("Basic YWRtaW46c2VjcmV0")), "Basic REDACTED");
    }

    #[test]
    fn test_redact_bearer() {
        assert_eq!(redact_authorization(Some("Bearer abc.def.ghi")), "Bearer REDACTED");
    }

    #[test]
    fn test_redact_unknown_scheme_hides_everything() {
        assert_eq!(redact_authorization(Some("Digest abc")), "REDACTED");
        assert_eq!(redact_authorization(Some("rawtoken")), "REDACTED");
    }

    #[test]
    fn test_redact_missing() {
        assert_eq!(redact_authorization(None), "NOT_SET");
    }

    #[test]
    fn test_trace_redacts_credentials() {
        let req = request().header(AUTHORIZATION, HeaderValue::from_static("Basic c2VjcmV0"));
        let trace = format_trace(&req);

        assert!(trace.starts_with("PUT http://127.0.0.1:8080/system/functions?namespace=dev\n"));
        assert!(trace.contains("authorization: Basic REDACTED\n"));
        assert!(trace.contains("user-agent: faasctl/test\n"));
        assert!(trace.ends_with("{\"service\":\"figlet\"}\n"));
        assert!(!trace.contains("c2VjcmV0"));
    }

    #[test]
    fn test_trace_leaves_body_readable() {
        let req = request();
        let _ = format_trace(&req);
        assert_eq!(req.text().as_deref(), Some(r#"{"service":"figlet"}"#));
    }

    #[test]
    fn test_dump_contains_request_line_and_body() {
        let dump = format_dump(&request());
        assert!(dump.starts_with("PUT /system/functions?namespace=dev HTTP/1.1\r\n"));
        assert!(dump.contains("Host: 127.0.0.1:8080\r\n"));
        assert!(dump.contains("\r\n\r\n{\"service\":\"figlet\"}"));
    }

    #[test]
    fn test_diagnostics_buffer_collects_output() {
        let (diagnostics, buffer) = Diagnostics::buffer();
        diagnostics.emit("one\n");
        diagnostics.emit("two\n");
        assert_eq!(buffer.contents(), "one\ntwo\n");
    }
}
