//! Protocol module for the Mauka RPC engine.
//!
//! This module implements the JSON-RPC 2.0 engine: message types, the
//! parser and composer, the arity-generic handler binder and dispatcher,
//! and the pipeline that drives a transport.

pub mod jsonrpc;

pub use self::jsonrpc::{
    MessagePipeline, RequestPipeline, ResponsePipeline, RpcId, RpcRequest, RpcResponse,
};
