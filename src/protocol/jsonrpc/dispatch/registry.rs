// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! `RpcDispatcher`: a name→binding registry with optional per-handler bound
//! context and before/after/error/fallback hooks.
//!
//! The registry offers no internal locking for mutation (`add`/`remove`):
//! it is read-mostly, and the caller is responsible for synchronizing
//! concurrent mutation (e.g. `Arc<RwLock<RpcDispatcher>>`), matching the
//! "registries are read-mostly, no core locking" rule carried throughout
//! this crate.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::binder::{BindError, ErasedHandler, IntoHandler, IntoHandlerWithCtx, validate_method_name};
use super::ctx::DispatchCtx;
use crate::protocol::jsonrpc::error::RpcError;
use crate::protocol::jsonrpc::types::{DispatchResult, RpcRequest};

type BeforeHook = Arc<dyn Fn(&RpcRequest) + Send + Sync>;
type AfterHook = Arc<dyn Fn(&RpcRequest, &DispatchResult) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&RpcRequest, &RpcError) + Send + Sync>;
type FallbackHook = Arc<dyn Fn(&RpcRequest) -> DispatchResult + Send + Sync>;

/// A name→binding method registry.
#[derive(Clone, Default)]
pub struct RpcDispatcher {
    handlers: HashMap<String, ErasedHandler>,
    on_before: Option<BeforeHook>,
    on_after: Option<AfterHook>,
    on_error: Option<ErrorHook>,
    on_fallback: Option<FallbackHook>,
}

impl RpcDispatcher {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler with no bound user context. Re-registration under
    /// the same name replaces the existing entry.
    pub fn add<M>(&mut self, name: impl Into<String>, handler: impl IntoHandler<M>) -> Result<(), BindError> {
        let name = name.into();
        validate_method_name(&name)?;
        self.handlers.insert(name, handler.into_erased());
        Ok(())
    }

    /// Registers a handler bound to a user context value `ctx`, cloned for
    /// every future call.
    pub fn add_with_ctx<C, M>(
        &mut self,
        name: impl Into<String>,
        ctx: C,
        handler: impl IntoHandlerWithCtx<C, M>,
    ) -> Result<(), BindError> {
        let name = name.into();
        validate_method_name(&name)?;
        self.handlers.insert(name, handler.into_erased_with(ctx));
        Ok(())
    }

    /// Registers an already-erased handler, for embedders building method
    /// tables at runtime (e.g. from a config file of exposed methods) rather
    /// than from statically-typed Rust functions.
    pub fn add_dyn(&mut self, name: impl Into<String>, handler: ErasedHandler) -> Result<(), BindError> {
        let name = name.into();
        validate_method_name(&name)?;
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Returns true if a handler is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the erased handler registered under `name`, if any. This is
    /// an existence/retrieval probe only; handlers are not otherwise
    /// introspectable (no parameter-type metadata is kept at runtime).
    pub fn get(&self, name: &str) -> Option<&ErasedHandler> {
        self.handlers.get(name)
    }

    /// Removes the handler registered under `name`, returning whether one was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    /// Sets the hook called before dispatch for every request.
    pub fn on_before(&mut self, hook: impl Fn(&RpcRequest) + Send + Sync + 'static) {
        self.on_before = Some(Arc::new(hook));
    }

    /// Sets the hook called after a successful (or error) dispatch.
    pub fn on_after(&mut self, hook: impl Fn(&RpcRequest, &DispatchResult) + Send + Sync + 'static) {
        self.on_after = Some(Arc::new(hook));
    }

    /// Sets the hook called when dispatch produces an error.
    pub fn on_error(&mut self, hook: impl Fn(&RpcRequest, &RpcError) + Send + Sync + 'static) {
        self.on_error = Some(Arc::new(hook));
    }

    /// Sets the fallback invoked when no handler matches the request's method.
    /// When unset, a method miss produces `MethodNotFound`.
    pub fn on_fallback(&mut self, hook: impl Fn(&RpcRequest) -> DispatchResult + Send + Sync + 'static) {
        self.on_fallback = Some(Arc::new(hook));
    }

    /// Dispatches one request: `on_before`, lookup, invoke (or fallback / `MethodNotFound`),
    /// `on_after` on success, `on_error` then propagate on failure.
    pub fn dispatch(&self, ctx: DispatchCtx, request: Arc<RpcRequest>) -> BoxFuture<'static, DispatchResult> {
        if let Some(before) = &self.on_before {
            before(&request);
        }

        let handler = self.handlers.get(&request.method).cloned();
        let on_after = self.on_after.clone();
        let on_error = self.on_error.clone();
        let fallback = self.on_fallback.clone();
        let params = request.params.clone();

        Box::pin(async move {
            let result = match handler {
                Some(handler) => handler(ctx, params).await,
                None => match &fallback {
                    Some(fallback) => fallback(&request),
                    None => DispatchResult::Err(RpcError::method_not_found(&request.method)),
                },
            };

            match &result {
                DispatchResult::Err(err) => {
                    if let Some(on_error) = &on_error {
                        on_error(&request, err);
                    }
                }
                _ => {
                    if let Some(on_after) = &on_after {
                        on_after(&request, &result);
                    }
                }
            }

            result
        })
    }
}

impl std::fmt::Debug for RpcDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcDispatcher")
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
