//! Transport configuration.
//!
//! Timeouts and identification are transport concerns, not part of the
//! adapter's contract, so they live here and are handed to `UreqTransport`.
//! Every field is optional; a missing section deserializes to the defaults.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Upper bound for the whole request, connect through body read.
    pub timeout_secs: Option<u64>,
    /// Sent as `User-Agent` unless the request sets one itself.
    pub user_agent: Option<String>,
    /// Largest response body accepted. Unbounded when unset.
    pub max_body_bytes: Option<u64>,
}

impl TransportConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn body_limit(&self) -> u64 {
        self.max_body_bytes.unwrap_or(u64::MAX)
    }
}
