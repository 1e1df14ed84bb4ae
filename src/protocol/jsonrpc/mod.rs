// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON-RPC 2.0 engine: message types, parsing, composing, arity-generic
//! handler dispatch, and the pipeline that glues them together.
//!
//! This module implements the [JSON-RPC 2.0 specification](https://www.jsonrpc.org/specification):
//! single requests/notifications, batches (including an empty batch, which
//! is valid and yields an empty response batch), and the standard error
//! code table.
//!
//! # Example
//!
//! ```
//! use mauka_rpc::protocol::jsonrpc::dispatch::{RequestDispatcher, RpcDispatcher};
//! use mauka_rpc::protocol::jsonrpc::pipeline::RequestPipeline;
//!
//! # async fn run() {
//! async fn echo(message: String) -> String {
//!     message
//! }
//!
//! let mut registry = RpcDispatcher::new();
//! registry.add("echo", echo).unwrap();
//! let pipeline = RequestPipeline::new(RequestDispatcher::Registry(registry));
//!
//! let request = r#"{"jsonrpc":"2.0","method":"echo","params":["hi"],"id":1}"#;
//! let response = pipeline.run_request(request.as_bytes()).await;
//! assert!(String::from_utf8(response).unwrap().contains(r#""result":"hi""#));
//! # }
//! ```

pub mod composer;
pub mod correlation;
pub mod dispatch;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use composer::{
    compose_batch_request, compose_batch_response, compose_error_response, compose_request,
    compose_response,
};
pub use correlation::{CorrelationError, RequestResponseCorrelator};
pub use error::{Error, ErrorCode, Result, RpcError};
pub use parser::parse_request;
pub use pipeline::{MessagePipeline, RequestPipeline, ResponsePipeline};
pub use types::{
    DispatchResult, RpcId, RpcRequest, RpcRequestMessage, RpcResponse, RpcResponseMessage,
};
