//! `Transport` implementation backed by `ureq`.
//!
//! # Design
//! ureq hands back a parsed `http::Response`, not the raw bytes a
//! header-including capture would produce, so the handle re-serializes the
//! status line and header block in front of the body and records its length
//! as the header size. Header names come back lowercased by the `http` crate.
//!
//! Each handle builds its own `ureq::Agent` at execution time. Nothing is
//! shared between handles, and with `forbid_reuse` the agent keeps no idle
//! connections at all. Redirects are never followed: a `3xx` is captured and
//! returned like any other status. The reason phrase is the canonical one for
//! the status code, since ureq does not keep the server's text.

use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::transport::{Transport, TransportHandle, TransportOptions};

/// Direct blocking HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    config: TransportConfig,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Transport for UreqTransport {
    type Handle = UreqHandle;

    fn init(&self) -> Option<UreqHandle> {
        Some(UreqHandle {
            config: self.config.clone(),
            options: None,
            header_size: None,
            http_code: None,
            last_error: String::new(),
        })
    }
}

#[derive(Debug)]
pub struct UreqHandle {
    config: TransportConfig,
    options: Option<TransportOptions>,
    header_size: Option<usize>,
    http_code: Option<u16>,
    last_error: String,
}

impl UreqHandle {
    fn agent(&self, forbid_reuse: bool) -> ureq::Agent {
        let mut builder = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(self.config.timeout());
        if forbid_reuse {
            builder = builder.max_idle_connections(0);
        }
        builder.build().new_agent()
    }

    fn fail(&mut self, message: String) -> Option<Vec<u8>> {
        warn!(error = %message, "transport execution failed");
        self.last_error = message;
        None
    }
}

impl TransportHandle for UreqHandle {
    fn set_options(&mut self, options: &TransportOptions) -> bool {
        // The response is always captured; there is nowhere else to write it.
        if options.url.is_empty() || !options.return_transfer {
            return false;
        }
        if options.headers.iter().any(|line| !line.contains(':')) {
            return false;
        }
        self.options = Some(options.clone());
        true
    }

    fn execute(&mut self) -> Option<Vec<u8>> {
        let Some(options) = self.options.clone() else {
            return self.fail("no options set".to_string());
        };

        let agent = self.agent(options.forbid_reuse);
        let mut request = agent.get(&options.url);
        let mut has_user_agent = false;
        for line in &options.headers {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if value.is_empty() {
                continue;
            }
            has_user_agent |= name.eq_ignore_ascii_case("user-agent");
            request = request.header(name, value);
        }
        if let Some(user_agent) = self.config.user_agent.as_ref().filter(|_| !has_user_agent) {
            request = request.header("User-Agent", user_agent.as_str());
        }

        debug!(url = %options.url, "executing request");
        let mut response = match request.call() {
            Ok(response) => response,
            Err(err) => return self.fail(err.to_string()),
        };
        let body = match response
            .body_mut()
            .with_config()
            .limit(self.config.body_limit())
            .read_to_vec()
        {
            Ok(body) => body,
            Err(err) => return self.fail(err.to_string()),
        };

        let status = response.status();
        let mut head = String::new();
        if options.include_headers {
            head.push_str(&format!(
                "{:?} {} {}\r\n",
                response.version(),
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ));
            for (name, value) in response.headers() {
                head.push_str(name.as_str());
                head.push_str(": ");
                head.push_str(&String::from_utf8_lossy(value.as_bytes()));
                head.push_str("\r\n");
            }
            head.push_str("\r\n");
        }

        self.header_size = Some(head.len());
        self.http_code = Some(status.as_u16());
        debug!(
            http_code = status.as_u16(),
            header_size = head.len(),
            body_len = body.len(),
            "response captured"
        );

        let mut raw = head.into_bytes();
        raw.extend_from_slice(&body);
        Some(raw)
    }

    fn header_size(&self) -> Option<usize> {
        self.header_size
    }

    fn http_code(&self) -> Option<u16> {
        self.http_code
    }

    fn last_error(&self) -> String {
        self.last_error.clone()
    }
}
