//! Verify `send` against the raw-capture vectors in `test-vectors/`.
//!
//! Each case supplies what a transport would capture (raw bytes, header size,
//! status code) and the headers, body, or error the adapter must produce.
//! Bodies are compared as parsed JSON values.

use std::cell::RefCell;
use std::rc::Rc;

use adapter_core::{
    Adapter, AdapterError, HttpAdapter, Request, Transport, TransportHandle, TransportOptions,
};

/// Replays one canned capture and records the options it was given.
#[derive(Clone)]
struct CannedTransport {
    raw: Vec<u8>,
    header_size: usize,
    http_code: u16,
    seen: Rc<RefCell<Option<TransportOptions>>>,
}

impl Transport for CannedTransport {
    type Handle = CannedTransport;

    fn init(&self) -> Option<CannedTransport> {
        Some(self.clone())
    }
}

impl TransportHandle for CannedTransport {
    fn set_options(&mut self, options: &TransportOptions) -> bool {
        *self.seen.borrow_mut() = Some(options.clone());
        true
    }

    fn execute(&mut self) -> Option<Vec<u8>> {
        Some(self.raw.clone())
    }

    fn header_size(&self) -> Option<usize> {
        Some(self.header_size)
    }

    fn http_code(&self) -> Option<u16> {
        Some(self.http_code)
    }

    fn last_error(&self) -> String {
        String::new()
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let mut request = Request::get("not under test");
        for (key, value) in string_pairs(&case["request_headers"]) {
            request = request.header(key, value);
        }

        let transport = CannedTransport {
            raw: case["raw"].as_str().unwrap().as_bytes().to_vec(),
            header_size: case["header_size"].as_u64().unwrap() as usize,
            http_code: case["http_code"].as_u64().unwrap() as u16,
            seen: Rc::default(),
        };
        let seen = Rc::clone(&transport.seen);
        let result = HttpAdapter::new(transport).send(&request);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "MalformedStatusLine" => assert!(
                    matches!(err, AdapterError::MalformedStatusLine(_)),
                    "{name}: expected MalformedStatusLine"
                ),
                reason => assert!(
                    matches!(&err, AdapterError::BodyParseError(class) if class.to_string() == reason),
                    "{name}: expected BodyParseError({reason}), got {err:?}"
                ),
            }
            continue;
        }

        let response = result.unwrap();

        // Verify what reached the transport
        let options = seen.borrow().clone().unwrap();
        let expected_transport_headers: Vec<String> =
            serde_json::from_value(case["expected_transport_headers"].clone()).unwrap();
        assert_eq!(options.headers, expected_transport_headers, "{name}: transport headers");

        // Verify parse
        assert_eq!(
            response.http_code() as u64,
            case["http_code"].as_u64().unwrap(),
            "{name}: http code"
        );
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(headers, string_pairs(&case["expected_headers"]), "{name}: headers");
        assert_eq!(response.body(), &case["expected_body"], "{name}: body");
    }
}
