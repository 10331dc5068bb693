//! Request and response values exchanged with an `Adapter`.
//!
//! # Design
//! Both types are plain data. A `Request` is built by the caller and only read
//! by the adapter; a `Response` is only ever constructed by the adapter after
//! every parsing step has succeeded, so callers never observe a half-filled
//! one. Headers use `IndexMap` because wire order is part of the contract.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// An outbound request described as plain data.
///
/// The method is kept as free text and compared case-insensitively when the
/// request is sent, so `"get"` and `"GET"` are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    url: String,
    method: String,
    #[serde(default)]
    headers: IndexMap<String, String>,
    #[serde(default)]
    query_params: IndexMap<String, String>,
}

impl Request {
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        headers: IndexMap<String, String>,
        query_params: IndexMap<String, String>,
    ) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers,
            query_params,
        }
    }

    /// Start a `GET` request with no headers or query parameters.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, "GET", IndexMap::new(), IndexMap::new())
    }

    /// Add or replace a header. Insertion order is the order sent on the wire.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn query_params(&self) -> &IndexMap<String, String> {
        &self.query_params
    }

    /// The URL the transport is pointed at: `url` with the query parameters
    /// form-encoded and appended. Returns `url` untouched when there are none.
    pub fn target_url(&self) -> String {
        if self.query_params.is_empty() {
            return self.url.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_params.iter())
            .finish();
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.url)
    }
}

/// A parsed response.
///
/// `headers` always begins with the synthesized `Response Code` and
/// `Response Status` entries, followed by the received headers in wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    http_code: u16,
    headers: IndexMap<String, String>,
    body: serde_json::Value,
}

impl Response {
    pub(crate) fn new(
        http_code: u16,
        headers: IndexMap<String, String>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            http_code,
            headers,
            body,
        }
    }

    pub fn http_code(&self) -> u16 {
        self.http_code
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Consume the response, keeping only the decoded body.
    pub fn into_body(self) -> serde_json::Value {
        self.body
    }
}
