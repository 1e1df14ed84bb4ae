// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Composes JSON-RPC 2.0 response and request bytes from typed inputs.

use serde_json::Value;

use super::error::RpcError;
use super::types::RpcId;

/// Wraps a result as response JSON. Returns `None` (no bytes at all) if `id`
/// is `RpcId::None` — there is nothing to address a response to for a
/// notification.
pub fn compose_response(id: &RpcId, result: Value) -> Option<Vec<u8>> {
    if id.is_none() {
        return None;
    }
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id_to_value(id),
    });
    serde_json::to_vec(&body).ok()
}

/// Composes an error response. Unlike `compose_response`, this always emits
/// bytes, even for `id = RpcId::None`, which serializes as JSON `null` — a
/// malformed notification still needs to be reported somewhere.
pub fn compose_error_response(id: &RpcId, error: &RpcError) -> Vec<u8> {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id_to_value(id),
        "error": error,
    });
    serde_json::to_vec(&body).unwrap_or_default()
}

/// Wraps pre-serialized response JSON fragments into a JSON array. An empty
/// `items` emits `[]`.
pub fn compose_batch_response(items: Vec<Vec<u8>>) -> Vec<u8> {
    compose_array(items)
}

/// Composes an outbound client-side request.
pub fn compose_request(method: &str, params: Option<Value>, id: &RpcId) -> Vec<u8> {
    let mut body = serde_json::Map::new();
    body.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    body.insert("method".to_string(), Value::String(method.to_string()));
    if let Some(params) = params {
        body.insert("params".to_string(), params);
    }
    if !id.is_none() {
        body.insert("id".to_string(), id_to_value(id));
    }
    serde_json::to_vec(&Value::Object(body)).unwrap_or_default()
}

/// Wraps pre-serialized request JSON fragments into a JSON array.
pub fn compose_batch_request(items: Vec<Vec<u8>>) -> Vec<u8> {
    compose_array(items)
}

fn compose_array(items: Vec<Vec<u8>>) -> Vec<u8> {
    let mut out = Vec::with_capacity(items.iter().map(Vec::len).sum::<usize>() + items.len() + 2);
    out.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        out.extend_from_slice(item);
    }
    out.push(b']');
    out
}

fn id_to_value(id: &RpcId) -> Value {
    match id {
        RpcId::None | RpcId::Null => Value::Null,
        RpcId::Num(n) => Value::from(*n),
        RpcId::Str(s) => Value::String(s.clone()),
    }
}
