// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The dispatch subsystem: the `DispatchCtx`/`Scratch` handler boundary, the
//! Handler Binder's compile-time arity machinery, the `RpcDispatcher`
//! registry, and the `RequestDispatcher`/`ResponseDispatcher` facades.

pub mod binder;
pub mod ctx;
pub mod facade;
pub mod registry;

pub use binder::{
    BindError, Coerced, ErasedHandler, FromParam, FromParamList, IntoDispatchResult, IntoHandler,
    IntoHandlerWithCtx, Json, RawArray, RawObject,
};
pub use ctx::{DispatchCtx, Scratch};
pub use facade::{RequestDispatch, RequestDispatcher, ResponseDispatch, ResponseDispatcher};
pub use registry::RpcDispatcher;
