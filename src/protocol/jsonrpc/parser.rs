// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Parses JSON-RPC 2.0 envelopes into [`RpcRequestMessage`] values.
//!
//! Envelope-level failures never propagate as a Rust error: they surface as
//! an embedded error-sentinel [`RpcRequest`] (`err.code` set, `id = RpcId::Null`),
//! so the dispatch pipeline can treat "malformed request" and "request that
//! failed its handler" uniformly as "produce an error response".

use serde_json::Value;

use super::error::RpcError;
use super::types::{RpcId, RpcRequest, RpcRequestMessage};

/// Parses a single JSON document (object or array) into a request message.
///
/// Always returns a value; this function never fails. Envelope-level parse or
/// validation failures are represented as an error-sentinel `RpcRequest`
/// wrapped in `RpcRequestMessage::Single`.
pub fn parse_request(bytes: &[u8]) -> RpcRequestMessage {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(e) => {
            return RpcRequestMessage::Single(RpcRequest::error_sentinel(RpcError::new(
                super::error::ErrorCode::ParseError,
                format!("Parse error: {e}"),
            )))
        }
    };

    match value {
        Value::Array(items) => {
            if items.is_empty() {
                RpcRequestMessage::Batch(Vec::new())
            } else {
                RpcRequestMessage::Batch(items.into_iter().map(parse_one).collect())
            }
        }
        other => RpcRequestMessage::Single(parse_one(other)),
    }
}

/// Parses a single JSON value (expected to be a JSON-RPC request object) into
/// an `RpcRequest`, producing an error-sentinel on any validation failure.
fn parse_one(value: Value) -> RpcRequest {
    let obj = match value {
        Value::Object(map) => map,
        _ => {
            return RpcRequest::error_sentinel(RpcError::invalid_request_because(
                "request must be a JSON object",
            ))
        }
    };

    if obj.is_empty() {
        return RpcRequest::error_sentinel(RpcError::invalid_request_because(
            "request object must not be empty",
        ));
    }

    match obj.get("jsonrpc") {
        Some(Value::String(v)) if v == "2.0" => {}
        _ => {
            return RpcRequest::error_sentinel(RpcError::invalid_request_because(
                "missing or invalid \"jsonrpc\" version, expected \"2.0\"",
            ))
        }
    }

    let method = match obj.get("method") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return RpcRequest::error_sentinel(RpcError::invalid_request_because(
                "missing, non-string, or empty \"method\"",
            ))
        }
    };

    let params = match obj.get("params") {
        None => Value::Null,
        Some(Value::Null) => Value::Null,
        Some(v @ Value::Array(_)) | Some(v @ Value::Object(_)) => v.clone(),
        Some(_) => {
            return RpcRequest::error_sentinel(RpcError::invalid_params(
                "\"params\" must be an array or object",
            ))
        }
    };

    let id = match RpcId::from_value_field(obj.get("id")) {
        Ok(id) => id,
        Err(message) => {
            return RpcRequest::error_sentinel(RpcError::invalid_request_because(message))
        }
    };

    RpcRequest::new(method, params, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn single(msg: RpcRequestMessage) -> RpcRequest {
        match msg {
            RpcRequestMessage::Single(r) => r,
            RpcRequestMessage::Batch(_) => panic!("expected single"),
        }
    }

    #[test]
    fn empty_input_is_parse_error() {
        let req = single(parse_request(b""));
        assert!(req.is_error_sentinel());
        assert_eq!(req.err.unwrap().code, -32700);
    }

    #[test]
    fn top_level_scalar_is_invalid_request() {
        let req = single(parse_request(b"42"));
        assert!(req.is_error_sentinel());
        assert_eq!(req.err.unwrap().code, -32600);
    }

    #[test]
    fn empty_object_is_invalid_request() {
        let req = single(parse_request(b"{}"));
        assert!(req.is_error_sentinel());
        assert_eq!(req.err.unwrap().code, -32600);
    }

    #[test]
    fn missing_jsonrpc_version_is_invalid_request() {
        let body = json!({"method": "add", "params": [1, 2], "id": 1}).to_string();
        let req = single(parse_request(body.as_bytes()));
        assert_eq!(req.err.unwrap().code, -32600);
    }

    #[test]
    fn missing_method_is_invalid_request() {
        let body = json!({"jsonrpc": "2.0", "id": 1}).to_string();
        let req = single(parse_request(body.as_bytes()));
        assert_eq!(req.err.unwrap().code, -32600);
    }

    #[test]
    fn scalar_params_is_invalid_params() {
        let body = json!({"jsonrpc": "2.0", "method": "add", "params": 1234, "id": 1}).to_string();
        let req = single(parse_request(body.as_bytes()));
        assert_eq!(req.err.unwrap().code, -32602);
    }

    #[test]
    fn fractional_id_is_invalid_request() {
        let body = json!({"jsonrpc": "2.0", "method": "add", "id": 1.5}).to_string();
        let req = single(parse_request(body.as_bytes()));
        assert_eq!(req.err.unwrap().code, -32600);
    }

    #[test]
    fn well_formed_request_parses() {
        let body = json!({"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1}).to_string();
        let req = single(parse_request(body.as_bytes()));
        assert!(!req.is_error_sentinel());
        assert_eq!(req.method, "add");
        assert_eq!(req.id, RpcId::Num(1));
    }

    #[test]
    fn notification_has_no_id() {
        let body = json!({"jsonrpc": "2.0", "method": "hello"}).to_string();
        let req = single(parse_request(body.as_bytes()));
        assert!(req.is_notification());
    }

    #[test]
    fn empty_batch_is_valid_empty_vector() {
        let msg = parse_request(b"[]");
        match msg {
            RpcRequestMessage::Batch(items) => assert!(items.is_empty()),
            RpcRequestMessage::Single(_) => panic!("expected batch"),
        }
    }

    #[test]
    fn batch_parses_each_element_independently() {
        let body = json!([
            {"jsonrpc": "2.0", "method": "inc", "id": 1},
            {"not": "valid"},
        ])
        .to_string();
        match parse_request(body.as_bytes()) {
            RpcRequestMessage::Batch(items) => {
                assert_eq!(items.len(), 2);
                assert!(!items[0].is_error_sentinel());
                assert!(items[1].is_error_sentinel());
            }
            RpcRequestMessage::Single(_) => panic!("expected batch"),
        }
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let body = r#"{"jsonrpc":"2.0","method":"first","method":"second","id":1}"#;
        let req = single(parse_request(body.as_bytes()));
        assert_eq!(req.method, "second");
    }
}
