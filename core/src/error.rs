//! Error types for the adapter.
//!
//! # Design
//! Each failure point of a `send` call has its own variant so callers can
//! match on exactly which step went wrong. JSON decode failures that fall in a
//! known class carry a `JsonErrorClass`; anything else is surfaced unlabelled
//! through `MalformedBody` with the underlying `serde_json::Error`.

use thiserror::Error;

/// Errors returned by `Adapter::send`.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The transport reported itself unavailable.
    #[error("HTTP transport must be enabled")]
    TransportUnavailable,

    #[error("Unsupported method '{0}' given")]
    UnsupportedMethod(String),

    #[error("Unable to initialize connection")]
    ConnectionInitFailed,

    #[error("Unable to prepare connection")]
    ConnectionPrepareFailed,

    /// The transport failed to execute; carries its error text verbatim.
    #[error("{0}")]
    TransportError(String),

    #[error("Unable to determine header size")]
    HeaderSizeUnavailable,

    #[error("Unable to determine response HTTP code")]
    StatusCodeUnavailable,

    /// The header block did not start with an `HTTP/<version> <code>` line.
    #[error("Unable to parse status line '{0}'")]
    MalformedStatusLine(String),

    #[error("Unable to parse response: {0}")]
    BodyParseError(JsonErrorClass),

    #[error("Unable to parse response body")]
    MalformedBody(#[source] serde_json::Error),
}

/// Recognized classes of JSON decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JsonErrorClass {
    #[error("The maximum stack depth has been exceeded")]
    Depth,

    /// Mismatched closing bracket, e.g. `[1}`.
    #[error("Invalid or malformed JSON")]
    StateMismatch,

    #[error("Control character error, possibly incorrectly encoded")]
    ControlCharacter,

    #[error("Syntax error")]
    Syntax,

    #[error("Malformed UTF-8 characters, possibly incorrectly encoded")]
    Utf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_method_message_quotes_method() {
        let err = AdapterError::UnsupportedMethod("foo".to_string());
        assert_eq!(err.to_string(), "Unsupported method 'foo' given");
    }

    #[test]
    fn transport_error_is_verbatim() {
        let err = AdapterError::TransportError("the error".to_string());
        assert_eq!(err.to_string(), "the error");
    }

    #[test]
    fn body_parse_error_names_reason() {
        let err = AdapterError::BodyParseError(JsonErrorClass::Syntax);
        assert_eq!(err.to_string(), "Unable to parse response: Syntax error");
    }
}
