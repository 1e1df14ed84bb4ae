// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The dispatcher/handler boundary: a reusable scratch buffer, a logger, a
//! user-data slot, and a handle to the request being dispatched.

use std::any::Any;
use std::sync::Arc;

use crate::logging::{Logger, NopLogger};
use crate::protocol::jsonrpc::types::RpcRequest;

/// A reusable byte buffer reset between requests (truncated, not freed).
///
/// This stands in for the arena allocator a non-Rust implementation of this
/// engine would need: Rust's ownership model already guarantees no dangling
/// references without a bump allocator, so the only job left for `Scratch` is
/// bounding steady-state allocation across a stream's lifetime, which a
/// reused `Vec<u8>` does directly.
#[derive(Debug, Default)]
pub struct Scratch {
    buf: Vec<u8>,
}

impl Scratch {
    /// Creates an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the buffer for a new request, retaining its allocation.
    pub fn reset(&mut self) {
        self.buf.truncate(0);
    }

    /// Borrows the buffer for writing.
    pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }

    /// Borrows the buffer's current contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the buffer's current capacity, useful for diagnostics.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

/// Per-request context handed to every dispatched handler.
///
/// Handlers receive this by value; it is cheap to clone (an `Arc` and a
/// request handle) except for `scratch`, which is exclusively owned by the
/// active request and is not `Clone`.
pub struct DispatchCtx {
    scratch: Scratch,
    logger: Arc<dyn Logger>,
    user_data: Option<Arc<dyn Any + Send + Sync>>,
    request: Arc<RpcRequest>,
}

impl DispatchCtx {
    /// Builds a new dispatch context for one request.
    pub fn new(request: Arc<RpcRequest>) -> Self {
        Self {
            scratch: Scratch::new(),
            logger: Arc::new(NopLogger),
            user_data: None,
            request,
        }
    }

    /// Attaches a logger, replacing the default `NopLogger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Attaches an arbitrary piece of user data, retrievable with `user_data`.
    pub fn with_user_data(mut self, data: Arc<dyn Any + Send + Sync>) -> Self {
        self.user_data = Some(data);
        self
    }

    /// Mutable access to the per-request scratch buffer.
    pub fn scratch(&mut self) -> &mut Scratch {
        &mut self.scratch
    }

    /// The configured logger.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// The embedder-supplied user data slot, if any.
    pub fn user_data(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.user_data.as_ref()
    }

    /// The request currently being dispatched.
    pub fn request(&self) -> &RpcRequest {
        &self.request
    }

    /// Resets the scratch buffer in place, reusing its allocation for the
    /// next request dispatched through this context.
    pub fn reset_scratch(&mut self) {
        self.scratch.reset();
    }
}

impl std::fmt::Debug for DispatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchCtx")
            .field("request", &self.request)
            .field("has_user_data", &self.user_data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_reset_retains_capacity() {
        let mut scratch = Scratch::new();
        scratch.as_mut_vec().extend_from_slice(b"hello world");
        let cap_before = scratch.capacity();
        scratch.reset();
        assert!(scratch.as_slice().is_empty());
        assert_eq!(scratch.capacity(), cap_before);
    }

    #[test]
    fn dispatch_ctx_exposes_request() {
        let request = Arc::new(RpcRequest::notification("ping", serde_json::Value::Null));
        let ctx = DispatchCtx::new(request);
        assert_eq!(ctx.request().method, "ping");
        assert!(ctx.user_data().is_none());
    }
}
