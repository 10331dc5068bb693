//! Header block parsing.
//!
//! Turns the status line and header lines captured by the transport into an
//! ordered mapping. The status line is folded into two synthesized entries,
//! `Response Code` and `Response Status`, which are always inserted first.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::AdapterError;

pub const RESPONSE_CODE: &str = "Response Code";
pub const RESPONSE_STATUS: &str = "Response Status";

/// Parse a raw header block.
///
/// Accepts `\r\n` or bare `\n` line endings. A block containing more than one
/// status line (interim `1xx` responses ahead of the final one) updates the
/// synthesized entries in place, so they keep their leading position.
pub fn parse_headers(text: &str) -> Result<IndexMap<String, String>, AdapterError> {
    let mut headers = IndexMap::new();
    let mut last_name: Option<String> = None;

    for line in text.split('\n').map(|l| l.trim_end_matches('\r')) {
        if line.trim().is_empty() {
            last_name = None;
            continue;
        }

        if headers.is_empty() {
            let (code, reason) = parse_status_line(line)
                .ok_or_else(|| AdapterError::MalformedStatusLine(line.to_string()))?;
            headers.insert(RESPONSE_CODE.to_string(), code.to_string());
            headers.insert(RESPONSE_STATUS.to_string(), reason.to_string());
            continue;
        }

        if line.starts_with("HTTP/") {
            if let Some((code, reason)) = parse_status_line(line) {
                headers.insert(RESPONSE_CODE.to_string(), code.to_string());
                headers.insert(RESPONSE_STATUS.to_string(), reason.to_string());
                last_name = None;
                continue;
            }
        }

        // obs-fold continuation of the previous header
        if line.starts_with([' ', '\t']) {
            if let Some(value) = last_name.as_ref().and_then(|name| headers.get_mut(name)) {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line.trim());
                continue;
            }
        }

        let Some((name, value)) = line.split_once(':') else {
            debug!(line, "skipping header line without a name");
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            debug!(line, "skipping header line without a name");
            continue;
        }
        let value = value.trim();

        match headers.get_mut(name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => {
                headers.insert(name.to_string(), value.to_string());
            }
        }
        last_name = Some(name.to_string());
    }

    if headers.is_empty() {
        return Err(AdapterError::MalformedStatusLine(String::new()));
    }
    Ok(headers)
}

/// Split `HTTP/<version> <code>[ <reason>]` into code and reason text.
fn parse_status_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("HTTP/")?;
    let (version, rest) = rest.split_once(' ')?;
    if version.is_empty() {
        return None;
    }
    let rest = rest.trim_start();
    let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((code, reason.trim()))
}
