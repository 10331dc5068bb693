//! The `send` operation: one synchronous GET, parsed into a `Response`.
//!
//! # Design
//! `HttpAdapter` is stateless apart from its transport. Each `send` acquires
//! its own handle, so an adapter can be shared across threads whenever the
//! transport allows it. Method and availability checks happen before a
//! handle exists. After that, the handle is scoped to the call and dropped on
//! every return path, and a `Response` is built only once all steps succeed.

use tracing::{debug, warn};

use crate::body::decode_body;
use crate::error::AdapterError;
use crate::headers::parse_headers;
use crate::http::{Request, Response};
use crate::transport::{Transport, TransportHandle, TransportOptions};
use crate::ureq_transport::UreqTransport;

/// A client able to execute a `Request`.
pub trait Adapter {
    fn send(&self, request: &Request) -> Result<Response, AdapterError>;
}

/// `Adapter` over any `Transport`, defaulting to a direct ureq call.
#[derive(Debug, Clone, Default)]
pub struct HttpAdapter<T = UreqTransport> {
    transport: T,
}

impl<T: Transport> HttpAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Adapter for HttpAdapter<T> {
    fn send(&self, request: &Request) -> Result<Response, AdapterError> {
        if !self.transport.is_available() {
            warn!("transport unavailable");
            return Err(AdapterError::TransportUnavailable);
        }
        if !request.method().eq_ignore_ascii_case("GET") {
            return Err(AdapterError::UnsupportedMethod(request.method().to_string()));
        }

        let options = TransportOptions::new(request.target_url(), outbound_headers(request));
        debug!(url = %options.url, headers = options.headers.len(), "sending request");

        let mut handle = self
            .transport
            .init()
            .ok_or(AdapterError::ConnectionInitFailed)?;
        if !handle.set_options(&options) {
            return Err(AdapterError::ConnectionPrepareFailed);
        }
        let raw = handle
            .execute()
            .ok_or_else(|| AdapterError::TransportError(handle.last_error()))?;
        let header_size = handle
            .header_size()
            .ok_or(AdapterError::HeaderSizeUnavailable)?;
        let http_code = handle
            .http_code()
            .ok_or(AdapterError::StatusCodeUnavailable)?;
        drop(handle);

        let (head, body) = split_response(&raw, header_size);
        let headers = parse_headers(&String::from_utf8_lossy(head))?;
        let body = decode_body(body)?;

        debug!(http_code, "response parsed");
        Ok(Response::new(http_code, headers, body))
    }
}

/// `Expect:` first, cleared so no `100-continue` handshake is attempted,
/// then the request's headers in order.
fn outbound_headers(request: &Request) -> Vec<String> {
    std::iter::once("Expect:".to_string())
        .chain(
            request
                .headers()
                .iter()
                .map(|(name, value)| format!("{name}: {value}")),
        )
        .collect()
}

/// Split captured bytes into header block and body.
///
/// The header block loses its final byte (the `\n` closing the blank
/// separator line). A header size past the end yields an empty body.
fn split_response(raw: &[u8], header_size: usize) -> (&[u8], &[u8]) {
    let split = header_size.min(raw.len());
    (&raw[..split.saturating_sub(1)], &raw[split..])
}
