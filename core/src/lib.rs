//! Synchronous JSON GET adapter.
//!
//! # Overview
//! `HttpAdapter::send` issues a single blocking GET for a `Request`, splits
//! the captured response at the transport-reported header size, and parses
//! the status line, headers, and JSON body into a `Response`.
//!
//! # Design
//! - The HTTP client library sits behind the `Transport` / `TransportHandle`
//!   traits. `UreqTransport` is the production implementation; tests supply
//!   scripted ones instead.
//! - Every failure step has its own `AdapterError` variant and no partial
//!   `Response` is ever returned.
//! - Header order is significant: `Response Code` and `Response Status` come
//!   first, then the received headers as they appeared.
//!
//! ```no_run
//! use adapter_core::{Adapter, HttpAdapter, Request};
//!
//! let adapter: HttpAdapter = HttpAdapter::default();
//! let request = Request::get("https://example.com/v1/comics").query("limit", "5");
//! let response = adapter.send(&request)?;
//! println!("{} {}", response.http_code(), response.body());
//! # Ok::<(), adapter_core::AdapterError>(())
//! ```

pub mod adapter;
pub mod body;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod transport;
pub mod ureq_transport;

pub use adapter::{Adapter, HttpAdapter};
pub use config::TransportConfig;
pub use error::{AdapterError, JsonErrorClass};
pub use headers::{RESPONSE_CODE, RESPONSE_STATUS};
pub use http::{Request, Response};
pub use transport::{Transport, TransportHandle, TransportOptions};
pub use ureq_transport::{UreqHandle, UreqTransport};
