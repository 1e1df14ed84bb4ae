// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Orchestrates parse → dispatch → compose, single or batch, with per-request
//! scratch reset.
//!
//! Every batch element — including notifications — is processed inline, in
//! order, within the same scratch-reset loop as addressable entries, so a
//! notification's side effect is guaranteed to have happened before any
//! later-ordered response in the same batch is composed. This differs from
//! fire-and-forget detached notification handling: ordering here is a
//! correctness property, not an incidental optimization.

use std::sync::Arc;

use crate::logging::Logger;

use super::composer::{compose_batch_response, compose_error_response, compose_response};
use super::dispatch::{DispatchCtx, RequestDispatcher, ResponseDispatcher};
use super::error::RpcError;
use super::parser::parse_request;
use super::types::{DispatchResult, RpcId, RpcRequest, RpcRequestMessage, RpcResponse, RpcResponseMessage};

/// Parses, dispatches, and composes requests against a `RequestDispatcher`.
pub struct RequestPipeline {
    dispatcher: RequestDispatcher,
    logger: Option<Arc<dyn Logger>>,
}

impl RequestPipeline {
    /// Builds a pipeline over the given dispatcher.
    pub fn new(dispatcher: RequestDispatcher) -> Self {
        Self {
            dispatcher,
            logger: None,
        }
    }

    /// Attaches a logger, invoked around each dispatched request.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Parses, dispatches, and composes a single request-or-batch document,
    /// returning the accumulated response bytes: empty for a pure-notification
    /// single request, `[]` for an empty batch, `[...]` for a non-empty batch.
    pub async fn run_request(&self, json: &[u8]) -> Vec<u8> {
        match parse_request(json) {
            RpcRequestMessage::Single(request) => self.run_single(request).await.unwrap_or_default(),
            RpcRequestMessage::Batch(requests) => self.run_batch(requests).await,
        }
    }

    /// Like `run_request`, but additionally parses the emitted response for
    /// caller convenience (test harnesses, in-process embedding).
    pub async fn run_request_to_response(&self, json: &[u8]) -> RpcResponseMessage {
        let bytes = self.run_request(json).await;
        if bytes.is_empty() {
            return RpcResponseMessage::None;
        }
        parse_response_message(&bytes)
    }

    async fn run_single(&self, request: RpcRequest) -> Option<Vec<u8>> {
        if let Some(err) = &request.err {
            // Error-sentinel requests skip dispatch entirely and emit their
            // diagnostic directly, always with id = null.
            return Some(compose_error_response(&RpcId::Null, err));
        }

        let id = request.id.clone();
        let request = Arc::new(request);
        if let Some(logger) = &self.logger {
            logger.log("request_pipeline", "dispatch", &request.method);
        }
        let ctx = DispatchCtx::new(request.clone());
        let result = self.dispatcher.dispatch(ctx, request).await;
        compose_result(&id, result)
    }

    async fn run_batch(&self, requests: Vec<RpcRequest>) -> Vec<u8> {
        let mut fragments = Vec::with_capacity(requests.len());
        for request in requests {
            if let Some(bytes) = self.run_single(request).await {
                fragments.push(bytes);
            }
        }
        compose_batch_response(fragments)
    }
}

fn compose_result(id: &RpcId, result: DispatchResult) -> Option<Vec<u8>> {
    match result {
        DispatchResult::None => None,
        DispatchResult::Result(value) => compose_response(id, value),
        DispatchResult::Err(err) => {
            if id.is_none() {
                None
            } else {
                Some(compose_error_response(id, &err))
            }
        }
    }
}

/// Parses response JSON and dispatches each entry to a `ResponseDispatcher`.
pub struct ResponsePipeline {
    dispatcher: ResponseDispatcher,
}

impl ResponsePipeline {
    /// Builds a pipeline over the given response dispatcher.
    pub fn new(dispatcher: ResponseDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Parses `json` as a response (single or batch) and dispatches each entry.
    pub fn run_response(&self, json: &[u8]) {
        match parse_response_message(json) {
            RpcResponseMessage::None => {}
            RpcResponseMessage::Single(resp) => self.dispatcher.dispatch(&resp),
            RpcResponseMessage::Batch(items) => {
                for resp in &items {
                    self.dispatcher.dispatch(resp);
                }
            }
        }
    }
}

/// Auto-detects request vs. response at the envelope level (`method` present
/// ⇒ request; `result`/`error` present ⇒ response) and routes to the
/// appropriate inner pipeline, enabling bidirectional peers.
pub struct MessagePipeline {
    requests: RequestPipeline,
    responses: ResponsePipeline,
}

impl MessagePipeline {
    /// Builds a bidirectional pipeline from its two halves.
    pub fn new(requests: RequestPipeline, responses: ResponsePipeline) -> Self {
        Self { requests, responses }
    }

    /// Routes one inbound document to the request or response pipeline,
    /// returning outbound response bytes only if a request was processed.
    pub async fn run_message(&self, json: &[u8]) -> Option<Vec<u8>> {
        let probe: serde_json::Value = serde_json::from_slice(json).ok()?;
        let is_request = match &probe {
            serde_json::Value::Object(map) => map.contains_key("method"),
            serde_json::Value::Array(items) => items
                .first()
                .and_then(|v| v.as_object())
                .map(|m| m.contains_key("method"))
                .unwrap_or(true),
            _ => true,
        };

        if is_request {
            let bytes = self.requests.run_request(json).await;
            if bytes.is_empty() {
                None
            } else {
                Some(bytes)
            }
        } else {
            self.responses.run_response(json);
            None
        }
    }
}

fn parse_response_message(json: &[u8]) -> RpcResponseMessage {
    let value: serde_json::Value = match serde_json::from_slice(json) {
        Ok(v) => v,
        Err(_) => return RpcResponseMessage::None,
    };

    match value {
        serde_json::Value::Array(items) => {
            RpcResponseMessage::Batch(items.into_iter().filter_map(parse_one_response).collect())
        }
        other => match parse_one_response(other) {
            Some(resp) => RpcResponseMessage::Single(resp),
            None => RpcResponseMessage::None,
        },
    }
}

fn parse_one_response(value: serde_json::Value) -> Option<RpcResponse> {
    let obj = value.as_object()?;
    let id = RpcId::from_value_field(obj.get("id")).ok()?;
    if let Some(result) = obj.get("result") {
        return Some(RpcResponse::success(id, result.clone()));
    }
    if let Some(error) = obj.get("error") {
        let err: RpcError = serde_json::from_value(error.clone()).ok()?;
        return Some(RpcResponse::error(id, err));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::dispatch::RpcDispatcher;
    use serde_json::json;

    async fn add(a: i64, b: i64) -> i64 {
        a + b
    }

    fn pipeline_with_add() -> RequestPipeline {
        let mut registry = RpcDispatcher::new();
        registry.add("add", add).unwrap();
        RequestPipeline::new(RequestDispatcher::Registry(registry))
    }

    #[tokio::test]
    async fn single_request_round_trip() {
        let pipeline = pipeline_with_add();
        let body = json!({"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1}).to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["result"], 3);
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn invalid_params_emits_error_with_id() {
        let pipeline = pipeline_with_add();
        let body = json!({"jsonrpc": "2.0", "method": "add", "params": [1], "id": 1}).to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], -32602);
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn notification_emits_no_bytes() {
        let pipeline = pipeline_with_add();
        let body = json!({"jsonrpc": "2.0", "method": "hello"}).to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn notification_dispatch_error_emits_no_bytes() {
        // A notification whose handler lookup fails (unknown method) still
        // has no addressable id, so the error must be suppressed like any
        // other notification outcome, not surfaced as an `id: null` response.
        let pipeline = pipeline_with_add();
        let body = json!({"jsonrpc": "2.0", "method": "unknown"}).to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn batch_notification_dispatch_error_contributes_no_entry() {
        let pipeline = pipeline_with_add();
        let body = json!([
            {"jsonrpc": "2.0", "method": "unknown"},
            {"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1},
        ])
        .to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[0]["result"], 3);
    }

    #[tokio::test]
    async fn batch_notification_runs_before_later_entry_reads_its_effect() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicI64::new(0));
        let mut registry = RpcDispatcher::new();
        registry
            .add_with_ctx("inc", counter.clone(), |counter: std::sync::Arc<std::sync::atomic::AtomicI64>| async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            })
            .unwrap();
        registry
            .add_with_ctx("get", counter, |counter: std::sync::Arc<std::sync::atomic::AtomicI64>| async move {
                counter.load(std::sync::atomic::Ordering::SeqCst)
            })
            .unwrap();

        let pipeline = RequestPipeline::new(RequestDispatcher::Registry(registry));
        // "inc" has no id, so it is a notification and contributes no response entry.
        let body = json!([
            {"jsonrpc": "2.0", "method": "inc"},
            {"jsonrpc": "2.0", "method": "get", "id": 2},
        ])
        .to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["result"], 1);
        assert_eq!(items[0]["id"], 2);
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_array() {
        let pipeline = pipeline_with_add();
        let bytes = pipeline.run_request(b"[]").await;
        assert_eq!(bytes, b"[]");
    }

    #[tokio::test]
    async fn rpc_prefixed_method_is_method_not_found() {
        let pipeline = pipeline_with_add();
        let body = json!({"jsonrpc": "2.0", "method": "rpc.foo", "id": 1}).to_string();
        let bytes = pipeline.run_request(body.as_bytes()).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], -32601);
    }
}
