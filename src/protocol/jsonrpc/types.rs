// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Types for the JSON-RPC 2.0 protocol.
//!
//! This module defines the core data structures for JSON-RPC 2.0 requests, responses, and
//! related types according to the [specification](https://www.jsonrpc.org/specification).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RpcError;

/// JSON-RPC request identifier.
///
/// Unlike `Option<String | i64 | null>`, `RpcId` distinguishes three distinct
/// wire states with a fourth, non-wire one: the id was entirely absent from
/// the source JSON (`None`, meaning this request is a notification), the id
/// was present and explicitly `null` (`Null`), or the id carries an actual
/// number or string identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RpcId {
    /// No `id` member was present in the source JSON. The request is a notification.
    #[default]
    None,

    /// The `id` member was present and explicitly JSON `null`.
    Null,

    /// A numeric identifier.
    Num(i64),

    /// A string identifier.
    Str(String),
}

impl RpcId {
    /// Returns true if this id is addressable, i.e. a real response could be
    /// routed back to it (`Num` or `Str`).
    pub fn is_addressable(&self) -> bool {
        matches!(self, RpcId::Num(_) | RpcId::Str(_))
    }

    /// Returns true if no `id` member was present in the source JSON.
    pub fn is_none(&self) -> bool {
        matches!(self, RpcId::None)
    }
}

impl fmt::Display for RpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcId::None => write!(f, "<none>"),
            RpcId::Null => write!(f, "null"),
            RpcId::Num(n) => write!(f, "{n}"),
            RpcId::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Serializes as the wire id: `Null`/`None` both become JSON `null` (an
/// absent id never reaches the wire on its own — callers check
/// `is_addressable`/`is_none` before deciding whether to serialize a response
/// at all), `Num`/`Str` become their JSON scalar.
impl Serialize for RpcId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            RpcId::None | RpcId::Null => serializer.serialize_unit(),
            RpcId::Num(n) => serializer.serialize_i64(*n),
            RpcId::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for RpcId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value_field(Some(&value)).map_err(serde::de::Error::custom)
    }
}

impl RpcId {
    /// Builds an `RpcId` from an optional `&Value` taken from the envelope's
    /// `id` member: `None` when the member was absent, `Some(value)` when present
    /// (including `Value::Null`).
    pub fn from_value_field(field: Option<&serde_json::Value>) -> std::result::Result<Self, String> {
        match field {
            None => Ok(RpcId::None),
            Some(serde_json::Value::Null) => Ok(RpcId::Null),
            Some(serde_json::Value::String(s)) => Ok(RpcId::Str(s.clone())),
            Some(serde_json::Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Ok(RpcId::Num(i))
                } else {
                    Err(format!("id must be an integer, got {n}"))
                }
            }
            Some(other) => Err(format!("id must be a string, number, or null, got {other}")),
        }
    }
}

/// A JSON-RPC 2.0 request object, or an error-sentinel carrying parser
/// diagnostics in place of a real invocation.
///
/// When `err` is `Some`, this value is an error-sentinel: it was produced by
/// the parser for an envelope that failed to validate, `id` is always
/// `RpcId::Null`, and `method`/`params` carry no meaning.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    /// JSON-RPC protocol version, always "2.0" for a well-formed request.
    pub jsonrpc: String,

    /// Name of the method to be invoked.
    pub method: String,

    /// Method parameters: `Value::Null`, an array, or an object.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,

    /// Request identifier. `RpcId::None` means this request is a notification.
    #[serde(skip_serializing_if = "RpcId::is_none")]
    pub id: RpcId,

    /// Present only for an error-sentinel request produced by the parser.
    #[serde(skip)]
    pub err: Option<RpcError>,
}

impl RpcRequest {
    /// Creates a new, well-formed JSON-RPC 2.0 request.
    pub fn new(method: impl Into<String>, params: serde_json::Value, id: RpcId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
            err: None,
        }
    }

    /// Creates a notification (no id).
    pub fn notification(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self::new(method, params, RpcId::None)
    }

    /// Creates an error-sentinel request carrying parser diagnostics.
    pub fn error_sentinel(err: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: String::new(),
            params: serde_json::Value::Null,
            id: RpcId::Null,
            err: Some(err),
        }
    }

    /// Returns true if this request is a notification (no id).
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Returns true if this is an error-sentinel produced by the parser.
    pub fn is_error_sentinel(&self) -> bool {
        self.err.is_some()
    }
}

/// A JSON-RPC 2.0 response object.
///
/// Exactly one of `result` or `err` is populated.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC protocol version, always "2.0".
    pub jsonrpc: String,

    /// The result of the method invocation, if successful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// The error object, if the invocation failed.
    #[serde(skip_serializing_if = "Option::is_none", rename = "error")]
    pub err: Option<RpcError>,

    /// Same identifier as the request this is responding to.
    pub id: RpcId,
}

impl RpcResponse {
    /// Creates a new successful JSON-RPC 2.0 response.
    pub fn success(id: RpcId, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            err: None,
            id,
        }
    }

    /// Creates a new error JSON-RPC 2.0 response.
    pub fn error(id: RpcId, err: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            err: Some(err),
            id,
        }
    }

    /// Returns true if this response contains a successful result.
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// Returns true if this response contains an error.
    pub fn is_error(&self) -> bool {
        self.err.is_some()
    }
}

/// The outcome of a handler invocation, as produced by the Handler Binder /
/// `IntoDispatchResult` and consumed by the pipeline's composer step.
#[derive(Debug, Clone)]
pub enum DispatchResult {
    /// The request was a notification, or the handler elected not to reply.
    /// The pipeline suppresses any response for such ids, even addressable ones.
    None,

    /// A successful result value.
    Result(serde_json::Value),

    /// A structured error.
    Err(RpcError),
}

impl DispatchResult {
    /// Returns true if this result should produce no response at all.
    pub fn is_none(&self) -> bool {
        matches!(self, DispatchResult::None)
    }
}

/// One parsed request, or a batch of them.
///
/// A zero-length batch is a valid parse: it produces an empty response batch
/// (`[]`), it is not treated as an error.
#[derive(Debug, Clone)]
pub enum RpcRequestMessage {
    /// A single request (or error-sentinel).
    Single(RpcRequest),
    /// A batch of requests, each independently valid or an error-sentinel.
    Batch(Vec<RpcRequest>),
}

impl RpcRequestMessage {
    /// Returns true if this message is a batch (including an empty one).
    pub fn is_batch(&self) -> bool {
        matches!(self, RpcRequestMessage::Batch(_))
    }
}

/// One parsed response, or a batch of them.
#[derive(Debug, Clone)]
pub enum RpcResponseMessage {
    /// No response at all (e.g. the source request was purely notifications).
    None,
    /// A single response.
    Single(RpcResponse),
    /// A batch of responses.
    Batch(Vec<RpcResponse>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_from_value_field_distinguishes_absent_and_null() {
        assert_eq!(RpcId::from_value_field(None).unwrap(), RpcId::None);
        assert_eq!(
            RpcId::from_value_field(Some(&serde_json::Value::Null)).unwrap(),
            RpcId::Null
        );
        assert_eq!(RpcId::from_value_field(Some(&json!(1))).unwrap(), RpcId::Num(1));
        assert_eq!(
            RpcId::from_value_field(Some(&json!("a"))).unwrap(),
            RpcId::Str("a".to_string())
        );
    }

    #[test]
    fn id_fractional_number_is_rejected() {
        assert!(RpcId::from_value_field(Some(&json!(1.5))).is_err());
    }

    #[test]
    fn request_serialization() {
        let request = RpcRequest::new("subtract", json!({"minuend": 42, "subtrahend": 23}), RpcId::Num(1));
        let json_str = serde_json::to_string(&request).unwrap();
        let expected = r#"{"jsonrpc":"2.0","method":"subtract","params":{"minuend":42,"subtrahend":23},"id":1}"#;
        assert_eq!(json_str, expected);
    }

    #[test]
    fn notification_has_no_id_semantics() {
        let notification = RpcRequest::notification("update", json!([1, 2, 3]));
        assert!(notification.is_notification());
        assert_eq!(notification.id, RpcId::None);
    }

    #[test]
    fn response_serialization() {
        let success = RpcResponse::success(RpcId::Num(1), json!(19));
        let json_str = serde_json::to_string(&success).unwrap();
        assert_eq!(json_str, r#"{"jsonrpc":"2.0","result":19,"id":1}"#);

        let error = RpcResponse::error(
            RpcId::Str("abc".to_string()),
            RpcError::new(super::super::error::ErrorCode::MethodNotFound, "Method not found"),
        );
        let json_str = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json_str,
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":"abc"}"#
        );
    }

    #[test]
    fn id_display() {
        assert_eq!(RpcId::Str("abc".to_string()).to_string(), "abc");
        assert_eq!(RpcId::Num(123).to_string(), "123");
        assert_eq!(RpcId::Null.to_string(), "null");
    }
}
