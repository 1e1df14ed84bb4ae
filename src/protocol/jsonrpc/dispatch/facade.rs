// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Polymorphic facades letting a pipeline call either a plain `RpcDispatcher`
//! registry or a user-defined switch-style dispatcher, and the client-side
//! mirror for correlating inbound responses.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::ctx::DispatchCtx;
use super::registry::RpcDispatcher;
use crate::protocol::jsonrpc::types::{DispatchResult, RpcRequest, RpcResponse};

/// A user-defined dispatcher that inspects the request directly (e.g.
/// switching on method name) rather than going through a name→handler map.
pub trait RequestDispatch: Send + Sync {
    /// Dispatches one request, returning its outcome.
    fn dispatch<'a>(&'a self, ctx: DispatchCtx, req: &'a RpcRequest) -> BoxFuture<'a, DispatchResult>;

    /// Called after dispatch completes, default no-op. Useful for custom
    /// dispatchers that want a post-dispatch hook without registry-style
    /// `on_after`/`on_error` wiring.
    fn dispatch_end(&self, _req: &RpcRequest, _result: &DispatchResult) {}
}

/// Either a plain name→handler registry, or a user-supplied dispatcher.
#[derive(Clone)]
pub enum RequestDispatcher {
    /// A plain `RpcDispatcher` registry.
    Registry(RpcDispatcher),
    /// A user-defined dispatcher.
    Custom(Arc<dyn RequestDispatch>),
}

impl RequestDispatcher {
    /// Dispatches one request through whichever backing dispatcher this facade wraps.
    pub async fn dispatch(&self, ctx: DispatchCtx, request: Arc<RpcRequest>) -> DispatchResult {
        match self {
            RequestDispatcher::Registry(registry) => registry.dispatch(ctx, request).await,
            RequestDispatcher::Custom(custom) => {
                let result = custom.dispatch(ctx, &request).await;
                custom.dispatch_end(&request, &result);
                result
            }
        }
    }
}

impl From<RpcDispatcher> for RequestDispatcher {
    fn from(registry: RpcDispatcher) -> Self {
        RequestDispatcher::Registry(registry)
    }
}

/// The client-side mirror of `RequestDispatch`: correlates an inbound
/// response with whatever tracked the original outbound call.
pub trait ResponseDispatch: Send + Sync {
    /// Handles one inbound response.
    fn dispatch(&self, resp: &RpcResponse);
}

/// Facade over a client-side response handler, kept symmetric with
/// `RequestDispatcher` even though there is currently only one variant: it
/// gives `MessagePipeline` a uniform type to hold regardless of which side
/// of the protocol a peer is acting as.
#[derive(Clone)]
pub enum ResponseDispatcher {
    /// A user-defined response handler (typically a `RequestResponseCorrelator`).
    Custom(Arc<dyn ResponseDispatch>),
}

impl ResponseDispatcher {
    /// Dispatches one inbound response.
    pub fn dispatch(&self, resp: &RpcResponse) {
        match self {
            ResponseDispatcher::Custom(custom) => custom.dispatch(resp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::types::RpcId;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct AlwaysOk;

    impl RequestDispatch for AlwaysOk {
        fn dispatch<'a>(&'a self, _ctx: DispatchCtx, _req: &'a RpcRequest) -> BoxFuture<'a, DispatchResult> {
            Box::pin(async { DispatchResult::Result(json!("ok")) })
        }
    }

    #[tokio::test]
    async fn custom_dispatcher_is_invoked() {
        let facade = RequestDispatcher::Custom(Arc::new(AlwaysOk));
        let request = Arc::new(RpcRequest::new("anything", json!(null), RpcId::Num(1)));
        let ctx = DispatchCtx::new(request.clone());
        let result = facade.dispatch(ctx, request).await;
        match result {
            DispatchResult::Result(v) => assert_eq!(v, json!("ok")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    struct Flag(Arc<AtomicBool>);

    impl ResponseDispatch for Flag {
        fn dispatch(&self, _resp: &RpcResponse) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn response_dispatcher_invokes_custom() {
        let flag = Arc::new(AtomicBool::new(false));
        let facade = ResponseDispatcher::Custom(Arc::new(Flag(flag.clone())));
        facade.dispatch(&RpcResponse::success(RpcId::Num(1), json!(1)));
        assert!(flag.load(Ordering::SeqCst));
    }
}
