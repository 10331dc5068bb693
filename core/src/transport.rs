//! The capability set an `HttpAdapter` needs from an HTTP client library.
//!
//! # Design
//! A `Transport` is a factory checked for availability and asked for one
//! `TransportHandle` per call. The handle is configured with a batch of
//! `TransportOptions`, executed once, and then queried for metadata about
//! the captured response. Dropping the handle releases it, so every exit
//! path of a call frees the underlying resources.
//!
//! Tests substitute their own implementation to script each capability's
//! outcome without any network access.

/// Options applied to a handle before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub url: String,
    /// Raw `Name: Value` lines. A line with nothing after the colon asks the
    /// transport to suppress that header instead of sending it.
    pub headers: Vec<String>,
    /// Hand the response back to the caller instead of writing it anywhere.
    pub return_transfer: bool,
    /// Prefix the returned bytes with the status line and header block.
    pub include_headers: bool,
    /// Close the connection after this request.
    pub forbid_reuse: bool,
}

impl TransportOptions {
    pub fn new(url: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            url: url.into(),
            headers,
            return_transfer: true,
            include_headers: true,
            forbid_reuse: true,
        }
    }
}

/// Factory for per-call transport handles.
pub trait Transport {
    type Handle: TransportHandle;

    /// Whether the transport can be used at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Acquire a fresh handle, or `None` if one cannot be created.
    fn init(&self) -> Option<Self::Handle>;
}

/// One exclusively owned transport handle. Released on drop.
pub trait TransportHandle {
    /// Apply a batch of options. Returns `false` if any option is rejected.
    fn set_options(&mut self, options: &TransportOptions) -> bool;

    /// Perform the request and return the captured bytes, or `None` on
    /// failure, in which case `last_error` describes what went wrong.
    fn execute(&mut self) -> Option<Vec<u8>>;

    /// Size in bytes of the status line and header block of the last execution.
    fn header_size(&self) -> Option<usize>;

    /// Status code of the last execution.
    fn http_code(&self) -> Option<u16>;

    fn last_error(&self) -> String;
}
