//! Response body decoding and decode-failure classification.

use serde::Deserialize;
use serde_json::error::Category;
use serde_json::{Map, Value};

use crate::error::{AdapterError, JsonErrorClass};

const JSON_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// Deepest array/object nesting accepted in a body.
pub const MAX_DEPTH: usize = 512;

/// Decode a response body as JSON.
///
/// An empty body, and any value that is "empty" in the loose sense (`null`,
/// `false`, `0`, `""`, `"0"`, `[]`, `{}`), decode to an empty object.
pub fn decode_body(bytes: &[u8]) -> Result<Value, AdapterError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| AdapterError::BodyParseError(JsonErrorClass::Utf8))?;
    if text.trim_matches(JSON_WHITESPACE).is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    if exceeds_depth(text, MAX_DEPTH) {
        return Err(AdapterError::BodyParseError(JsonErrorClass::Depth));
    }

    let value = parse(text).map_err(|err| classify(text, err))?;
    if is_falsy(&value) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(value)
}

/// Parse without serde_json's own recursion limit; `MAX_DEPTH` is enforced
/// beforehand and the stack grows on demand.
fn parse(text: &str) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Whether brackets outside string literals nest deeper than `max`.
fn exceeds_depth(text: &str, max: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > max {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Map a decode failure onto a `JsonErrorClass`, or leave it unlabelled.
///
/// serde_json does not expose its error codes, so syntax errors are told
/// apart by the leading text of their message.
fn classify(text: &str, err: serde_json::Error) -> AdapterError {
    let class = match err.classify() {
        Category::Syntax | Category::Eof => syntax_class(text, &err),
        Category::Io | Category::Data => None,
    };
    match class {
        Some(class) => AdapterError::BodyParseError(class),
        None => AdapterError::MalformedBody(err),
    }
}

fn syntax_class(text: &str, err: &serde_json::Error) -> Option<JsonErrorClass> {
    let message = err.to_string();
    if message.starts_with("control character") {
        return Some(JsonErrorClass::ControlCharacter);
    }
    // Escapes naming an unpaired surrogate or an invalid code point.
    if message.starts_with("lone leading surrogate")
        || message.starts_with("invalid unicode code point")
    {
        return None;
    }
    let wrong_close = if message.starts_with("expected `,` or `]`") {
        Some(b'}')
    } else if message.starts_with("expected `,` or `}`") {
        Some(b']')
    } else {
        None
    };
    if let Some(bracket) = wrong_close {
        if byte_at(text, err.line(), err.column()) == Some(bracket) {
            return Some(JsonErrorClass::StateMismatch);
        }
    }
    Some(JsonErrorClass::Syntax)
}

/// The byte at a 1-based line and column as reported by serde_json.
fn byte_at(text: &str, line: usize, column: usize) -> Option<u8> {
    let line_start = if line <= 1 {
        0
    } else {
        text.match_indices('\n').nth(line - 2)?.0 + 1
    };
    let offset = (line_start + column).checked_sub(1)?;
    text.as_bytes().get(offset).copied()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn class_of(bytes: &[u8]) -> JsonErrorClass {
        match decode_body(bytes).unwrap_err() {
            AdapterError::BodyParseError(class) => class,
            other => panic!("expected a classified error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_object_after_leading_newline() {
        assert_eq!(decode_body(b"\n{\"foo\":\"bar\"}").unwrap(), json!({"foo": "bar"}));
    }

    #[test]
    fn decodes_non_empty_array() {
        assert_eq!(decode_body(b"[1,2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(decode_body(b"").unwrap(), json!({}));
        assert_eq!(decode_body(b" \r\n").unwrap(), json!({}));
    }

    #[test]
    fn falsy_values_are_empty_object() {
        for body in ["null", "false", "0", "0.0", "\"\"", "\"0\"", "[]", "{}"] {
            assert_eq!(decode_body(body.as_bytes()).unwrap(), json!({}), "{body}");
        }
    }

    #[test]
    fn truthy_scalars_are_kept() {
        assert_eq!(decode_body(b"true").unwrap(), json!(true));
        assert_eq!(decode_body(b"\"x\"").unwrap(), json!("x"));
        assert_eq!(decode_body(b"7").unwrap(), json!(7));
    }

    #[test]
    fn syntax_error() {
        assert_eq!(class_of(b"{xx}}"), JsonErrorClass::Syntax);
        assert_eq!(class_of(b"{\"a\":"), JsonErrorClass::Syntax);
        assert_eq!(class_of(b"[1 2]"), JsonErrorClass::Syntax);
    }

    #[test]
    fn mismatched_bracket_is_state_mismatch() {
        assert_eq!(class_of(b"[1}"), JsonErrorClass::StateMismatch);
        assert_eq!(class_of(b"{\"a\":1]"), JsonErrorClass::StateMismatch);
        assert_eq!(class_of(b"{\n\"a\": 1\n]"), JsonErrorClass::StateMismatch);
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn deep_nesting_exceeds_depth() {
        assert_eq!(class_of(nested(MAX_DEPTH + 1).as_bytes()), JsonErrorClass::Depth);
        assert_eq!(class_of(nested(5000).as_bytes()), JsonErrorClass::Depth);
    }

    #[test]
    fn nesting_up_to_max_depth_decodes() {
        let value = decode_body(nested(MAX_DEPTH).as_bytes()).unwrap();
        assert!(value.is_array());

        let deep_object = format!("{}1{}", r#"{"a":"#.repeat(300), "}".repeat(300));
        assert!(decode_body(deep_object.as_bytes()).unwrap().is_object());
    }

    #[test]
    fn brackets_inside_strings_do_not_count() {
        let body = format!(r#"{{"a":"{}\"{}"}}"#, "[".repeat(600), "{".repeat(600));
        assert!(decode_body(body.as_bytes()).unwrap().is_object());
    }

    #[test]
    fn raw_control_character_in_string() {
        assert_eq!(class_of(b"{\"a\":\"x\x01y\"}"), JsonErrorClass::ControlCharacter);
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(class_of(b"{\"a\":\"\xff\"}"), JsonErrorClass::Utf8);
    }

    #[test]
    fn unpaired_surrogate_is_unlabelled() {
        let err = decode_body(br#"["\udc00"]"#).unwrap_err();
        assert!(matches!(err, AdapterError::MalformedBody(_)));
    }
}
