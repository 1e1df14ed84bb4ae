// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The Handler Binder: compile-time generic trait machinery that adapts a
//! host function of arbitrary arity and parameter types into the uniform
//! erased callable the registry stores.
//!
//! Four signature families are supported, each crossed with business-param
//! arity 0..=9:
//!
//! 1. `Fn(P1, .., Pn) -> Fut` — business params only.
//! 2. `Fn(&DispatchCtx, P1, .., Pn) -> Fut` — plus ambient context.
//! 3. `Fn(C, P1, .., Pn) -> Fut` — plus a bound user context value.
//! 4. `Fn(C, &DispatchCtx, P1, .., Pn) -> Fut` — both.
//!
//! The families are erased to the same `ErasedHandler` type via
//! `macro_rules!`-generated tuple impls, the idiomatic substitute for
//! reflection on a function's arity and parameter types.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::ctx::DispatchCtx;
use crate::protocol::jsonrpc::error::RpcError;
use crate::protocol::jsonrpc::types::DispatchResult;

/// The uniform, type-erased handler shape the registry stores.
pub type ErasedHandler = Arc<dyn Fn(DispatchCtx, Value) -> BoxFuture<'static, DispatchResult> + Send + Sync>;

/// Registration-time failures for the non-generic registration path
/// (`add_dyn`), which accepts a boxed closure plus an explicit parameter-type
/// descriptor rather than a statically-typed function. The type-checked
/// generic registration paths (`add`, `add_with_ctx`) cannot produce these:
/// arity and parameter type mismatches fail to compile instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The handler declares more than nine business parameters.
    #[error("handler declares too many parameters (max 9)")]
    HandlerTooManyParams,

    /// A declared parameter type descriptor does not match a supported `FromParam` type.
    #[error("handler declares an unsupported parameter type: {0}")]
    HandlerInvalidParameterType(String),

    /// The method name is empty or begins with the reserved `rpc.` prefix.
    #[error("invalid method name: {0}")]
    InvalidMethodName(String),
}

/// Binds a single JSON value (an array element, or the whole `params` value
/// for a single-parameter handler) to a concrete Rust type.
pub trait FromParam: Sized {
    /// Binds from a JSON value known to be this parameter's slot.
    fn from_param(value: &Value) -> Result<Self, RpcError>;

    /// Binds the *whole* `params` value for a single-parameter handler.
    ///
    /// The default unwraps a one-element array before delegating to
    /// `from_param`, matching array-positional calling convention; `Value`
    /// overrides this since it must receive `params` verbatim regardless of
    /// shape.
    fn bind_single(params: &Value) -> Result<Self, RpcError> {
        match params {
            Value::Array(items) if items.len() == 1 => Self::from_param(&items[0]),
            other => Self::from_param(other),
        }
    }
}

macro_rules! impl_from_param_int {
    ($ty:ty) => {
        impl FromParam for $ty {
            fn from_param(value: &Value) -> Result<Self, RpcError> {
                match value {
                    Value::Number(n) => n.as_i64().and_then(|i| <$ty>::try_from(i).ok()).ok_or_else(|| {
                        RpcError::invalid_params(format!(
                            "expected an integer convertible to {}, got {n}",
                            stringify!($ty)
                        ))
                    }),
                    other => Err(RpcError::invalid_params(format!(
                        "expected an integer, got {other}"
                    ))),
                }
            }
        }
    };
}

impl_from_param_int!(i32);
impl_from_param_int!(u32);
impl_from_param_int!(u64);

impl FromParam for i64 {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| RpcError::invalid_params(format!("expected an integer, got {n}"))),
            other => Err(RpcError::invalid_params(format!("expected an integer, got {other}"))),
        }
    }
}

impl FromParam for f64 {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| RpcError::invalid_params(format!("expected a number, got {n}"))),
            other => Err(RpcError::invalid_params(format!("expected a number, got {other}"))),
        }
    }
}

impl FromParam for bool {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(RpcError::invalid_params(format!("expected a bool, got {other}"))),
        }
    }
}

impl FromParam for String {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(RpcError::invalid_params(format!("expected a string, got {other}"))),
        }
    }
}

impl FromParam for Value {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        Ok(value.clone())
    }

    fn bind_single(params: &Value) -> Result<Self, RpcError> {
        Ok(params.clone())
    }
}

/// Raw JSON array passthrough.
pub type RawArray = Vec<Value>;

impl FromParam for RawArray {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::Array(items) => Ok(items.clone()),
            other => Err(RpcError::invalid_params(format!("expected an array, got {other}"))),
        }
    }
}

/// Raw JSON object passthrough.
pub type RawObject = serde_json::Map<String, Value>;

impl FromParam for RawObject {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::Object(map) => Ok(map.clone()),
            other => Err(RpcError::invalid_params(format!("expected an object, got {other}"))),
        }
    }
}

impl<T: FromParam> FromParam for Option<T> {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_param(value)?))
        }
    }

    fn bind_single(params: &Value) -> Result<Self, RpcError> {
        match params {
            Value::Null => Ok(None),
            Value::Array(items) if items.is_empty() => Ok(None),
            Value::Array(items) if items.len() == 1 => Ok(Some(T::from_param(&items[0])?)),
            other => Ok(Some(T::from_param(other)?)),
        }
    }
}

/// Opt-in wrapper binding a JSON bool directly, or a number via
/// "nonzero is true", for handlers that want numeric truthiness instead of
/// the plain `bool` path's strict bool-only binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coerced<T>(pub T);

impl FromParam for Coerced<bool> {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        match value {
            Value::Bool(b) => Ok(Coerced(*b)),
            Value::Number(n) => Ok(Coerced(n.as_f64().map(|f| f != 0.0).unwrap_or(false))),
            other => Err(RpcError::invalid_params(format!(
                "expected a bool or number, got {other}"
            ))),
        }
    }
}

/// Wrapper parsing a struct from a JSON object (or the whole `params` value).
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: DeserializeOwned> FromParam for Json<T> {
    fn from_param(value: &Value) -> Result<Self, RpcError> {
        serde_json::from_value(value.clone())
            .map(Json)
            .map_err(|e| RpcError::invalid_params(e.to_string()))
    }
}

/// Binds the whole `params` value (array of N elements or, for a single
/// business parameter, a bare value/object) into a tuple of parameter types.
pub trait FromParamList: Sized {
    /// Number of business parameters this tuple represents.
    const ARITY: usize;

    /// Binds `params` into this tuple.
    fn from_params(params: &Value) -> Result<Self, RpcError>;
}

impl FromParamList for () {
    const ARITY: usize = 0;

    fn from_params(params: &Value) -> Result<Self, RpcError> {
        match params {
            Value::Null => Ok(()),
            Value::Array(items) if items.is_empty() => Ok(()),
            Value::Object(map) if map.is_empty() => Ok(()),
            _ => Err(RpcError::invalid_params("expected no parameters")),
        }
    }
}

impl<P1: FromParam> FromParamList for (P1,) {
    const ARITY: usize = 1;

    fn from_params(params: &Value) -> Result<Self, RpcError> {
        Ok((P1::bind_single(params)?,))
    }
}

macro_rules! impl_from_param_list_positional {
    ($n:literal; $($P:ident = $idx:tt),+) => {
        impl<$($P: FromParam),+> FromParamList for ($($P,)+) {
            const ARITY: usize = $n;

            fn from_params(params: &Value) -> Result<Self, RpcError> {
                match params {
                    Value::Array(items) if items.len() == $n => {
                        Ok(($($P::from_param(&items[$idx])?,)+))
                    }
                    _ => Err(RpcError::invalid_params(format!(
                        "expected an array of {} parameters", $n
                    ))),
                }
            }
        }
    };
}

impl_from_param_list_positional!(2; P1 = 0, P2 = 1);
impl_from_param_list_positional!(3; P1 = 0, P2 = 1, P3 = 2);
impl_from_param_list_positional!(4; P1 = 0, P2 = 1, P3 = 2, P4 = 3);
impl_from_param_list_positional!(5; P1 = 0, P2 = 1, P3 = 2, P4 = 3, P5 = 4);
impl_from_param_list_positional!(6; P1 = 0, P2 = 1, P3 = 2, P4 = 3, P5 = 4, P6 = 5);
impl_from_param_list_positional!(7; P1 = 0, P2 = 1, P3 = 2, P4 = 3, P5 = 4, P6 = 5, P7 = 6);
impl_from_param_list_positional!(8; P1 = 0, P2 = 1, P3 = 2, P4 = 3, P5 = 4, P6 = 5, P7 = 6, P8 = 7);
impl_from_param_list_positional!(9; P1 = 0, P2 = 1, P3 = 2, P4 = 3, P5 = 4, P6 = 5, P7 = 6, P8 = 7, P9 = 8);

/// Converts a handler's return value into the uniform `DispatchResult`.
pub trait IntoDispatchResult {
    /// Performs the conversion.
    fn into_dispatch_result(self) -> DispatchResult;
}

impl IntoDispatchResult for () {
    fn into_dispatch_result(self) -> DispatchResult {
        DispatchResult::None
    }
}

impl IntoDispatchResult for DispatchResult {
    fn into_dispatch_result(self) -> DispatchResult {
        self
    }
}

macro_rules! impl_into_dispatch_result_scalar {
    ($ty:ty) => {
        impl IntoDispatchResult for $ty {
            fn into_dispatch_result(self) -> DispatchResult {
                DispatchResult::Result(Value::from(self))
            }
        }
    };
}

impl_into_dispatch_result_scalar!(i64);
impl_into_dispatch_result_scalar!(i32);
impl_into_dispatch_result_scalar!(u32);
impl_into_dispatch_result_scalar!(u64);
impl_into_dispatch_result_scalar!(f64);
impl_into_dispatch_result_scalar!(bool);
impl_into_dispatch_result_scalar!(String);

impl IntoDispatchResult for Value {
    fn into_dispatch_result(self) -> DispatchResult {
        DispatchResult::Result(self)
    }
}

impl<T: Serialize> IntoDispatchResult for Json<T> {
    fn into_dispatch_result(self) -> DispatchResult {
        match serde_json::to_value(self.0) {
            Ok(v) => DispatchResult::Result(v),
            Err(e) => DispatchResult::Err(RpcError::internal_error(e.to_string())),
        }
    }
}

impl<R, E> IntoDispatchResult for Result<R, E>
where
    R: IntoDispatchResult,
    E: std::fmt::Display,
{
    fn into_dispatch_result(self) -> DispatchResult {
        match self {
            Ok(r) => r.into_dispatch_result(),
            Err(e) => DispatchResult::Err(RpcError::server_error(e.to_string())),
        }
    }
}

/// Marker distinguishing the business-params-only signature family.
#[derive(Debug)]
pub struct NoCtxMarker;

/// Marker distinguishing the business-params + ambient `&DispatchCtx` family.
#[derive(Debug)]
pub struct WithCtxMarker;

/// Marker distinguishing the business-params + bound user context family.
#[derive(Debug)]
pub struct WithUserCtxMarker;

/// Marker distinguishing the business-params + bound user context + ambient
/// `&DispatchCtx` family.
#[derive(Debug)]
pub struct WithUserCtxAndDispatchMarker;

/// Adapts a host function with no bound user context into an `ErasedHandler`.
pub trait IntoHandler<Marker>: Clone + Send + Sync + 'static {
    /// Performs the erasure.
    fn into_erased(self) -> ErasedHandler;
}

/// Adapts a host function taking a bound user context value `C`, supplied
/// once at registration, into an `ErasedHandler`.
pub trait IntoHandlerWithCtx<C, Marker>: Clone + Send + Sync + 'static {
    /// Performs the erasure, capturing `ctx` for every future call.
    fn into_erased_with(self, ctx: C) -> ErasedHandler;
}

macro_rules! impl_handler_families {
    ($($P:ident),*) => {
        #[allow(non_snake_case, unused_parens, unused_variables, unused_mut)]
        impl<F, Fut, R, $($P),*> IntoHandler<(NoCtxMarker, $($P,)*)> for F
        where
            F: Fn($($P),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoDispatchResult,
            $($P: FromParam + Send + 'static,)*
            ($($P,)*): FromParamList,
        {
            fn into_erased(self) -> ErasedHandler {
                Arc::new(move |_ctx: DispatchCtx, params: Value| {
                    let f = self.clone();
                    Box::pin(async move {
                        match <($($P,)*) as FromParamList>::from_params(&params) {
                            Ok(($($P,)*)) => f($($P),*).await.into_dispatch_result(),
                            Err(e) => DispatchResult::Err(e),
                        }
                    })
                })
            }
        }

        #[allow(non_snake_case, unused_parens, unused_variables, unused_mut)]
        impl<F, Fut, R, $($P),*> IntoHandler<(WithCtxMarker, $($P,)*)> for F
        where
            F: Fn(&DispatchCtx, $($P),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoDispatchResult,
            $($P: FromParam + Send + 'static,)*
            ($($P,)*): FromParamList,
        {
            fn into_erased(self) -> ErasedHandler {
                Arc::new(move |ctx: DispatchCtx, params: Value| {
                    let f = self.clone();
                    Box::pin(async move {
                        match <($($P,)*) as FromParamList>::from_params(&params) {
                            Ok(($($P,)*)) => f(&ctx, $($P),*).await.into_dispatch_result(),
                            Err(e) => DispatchResult::Err(e),
                        }
                    })
                })
            }
        }

        #[allow(non_snake_case, unused_parens, unused_variables, unused_mut)]
        impl<F, Fut, R, C, $($P),*> IntoHandlerWithCtx<C, (WithUserCtxMarker, $($P,)*)> for F
        where
            F: Fn(C, $($P),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoDispatchResult,
            C: Clone + Send + Sync + 'static,
            $($P: FromParam + Send + 'static,)*
            ($($P,)*): FromParamList,
        {
            fn into_erased_with(self, ctx: C) -> ErasedHandler {
                Arc::new(move |_dctx: DispatchCtx, params: Value| {
                    let f = self.clone();
                    let ctx = ctx.clone();
                    Box::pin(async move {
                        match <($($P,)*) as FromParamList>::from_params(&params) {
                            Ok(($($P,)*)) => f(ctx, $($P),*).await.into_dispatch_result(),
                            Err(e) => DispatchResult::Err(e),
                        }
                    })
                })
            }
        }

        #[allow(non_snake_case, unused_parens, unused_variables, unused_mut)]
        impl<F, Fut, R, C, $($P),*> IntoHandlerWithCtx<C, (WithUserCtxAndDispatchMarker, $($P,)*)> for F
        where
            F: Fn(C, &DispatchCtx, $($P),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoDispatchResult,
            C: Clone + Send + Sync + 'static,
            $($P: FromParam + Send + 'static,)*
            ($($P,)*): FromParamList,
        {
            fn into_erased_with(self, ctx: C) -> ErasedHandler {
                Arc::new(move |dctx: DispatchCtx, params: Value| {
                    let f = self.clone();
                    let ctx = ctx.clone();
                    Box::pin(async move {
                        match <($($P,)*) as FromParamList>::from_params(&params) {
                            Ok(($($P,)*)) => f(ctx, &dctx, $($P),*).await.into_dispatch_result(),
                            Err(e) => DispatchResult::Err(e),
                        }
                    })
                })
            }
        }
    };
}

macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!();
        $name!(P1);
        $name!(P1, P2);
        $name!(P1, P2, P3);
        $name!(P1, P2, P3, P4);
        $name!(P1, P2, P3, P4, P5);
        $name!(P1, P2, P3, P4, P5, P6);
        $name!(P1, P2, P3, P4, P5, P6, P7);
        $name!(P1, P2, P3, P4, P5, P6, P7, P8);
        $name!(P1, P2, P3, P4, P5, P6, P7, P8, P9);
    };
}

all_the_tuples!(impl_handler_families);

/// Validates a method name against the registration rules shared by every
/// registration path (`add`, `add_with_ctx`, `add_dyn`): non-empty, and not
/// beginning with the reserved `rpc.` prefix.
pub fn validate_method_name(name: &str) -> Result<(), BindError> {
    if name.is_empty() {
        return Err(BindError::InvalidMethodName("method name must not be empty".to_string()));
    }
    if name.starts_with("rpc.") {
        return Err(BindError::InvalidMethodName(format!(
            "method name \"{name}\" uses the reserved \"rpc.\" prefix"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_two_positional_params() {
        let params = serde_json::json!([1, 2]);
        let (a, b): (i64, i64) = FromParamList::from_params(&params).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn single_value_param_passes_through_whole_params() {
        let params = serde_json::json!({"a": 1});
        let (v,): (Value,) = FromParamList::from_params(&params).unwrap();
        assert_eq!(v, params);
    }

    #[test]
    fn single_json_param_parses_object() {
        #[derive(serde::Deserialize)]
        struct Point {
            x: i64,
            y: i64,
        }
        let params = serde_json::json!({"x": 1, "y": 2});
        let (Json(point),): (Json<Point>,) = FromParamList::from_params(&params).unwrap();
        assert_eq!(point.x, 1);
        assert_eq!(point.y, 2);
    }

    #[test]
    fn option_single_param_absent_is_none() {
        let (opt,): (Option<i64>,) = FromParamList::from_params(&Value::Null).unwrap();
        assert!(opt.is_none());
    }

    #[test]
    fn option_single_param_bare_value_is_some() {
        let (opt,): (Option<i64>,) = FromParamList::from_params(&serde_json::json!(5)).unwrap();
        assert_eq!(opt, Some(5));
    }

    #[test]
    fn coerced_bool_accepts_nonzero_number() {
        let Coerced(b) = Coerced::<bool>::from_param(&serde_json::json!(3)).unwrap();
        assert!(b);
    }

    #[test]
    fn wrong_arity_array_is_invalid_params() {
        let params = serde_json::json!([1]);
        let result: Result<(i64, i64), RpcError> = FromParamList::from_params(&params);
        assert!(result.is_err());
    }

    #[test]
    fn method_name_validation_rejects_reserved_prefix() {
        assert!(validate_method_name("rpc.internal").is_err());
        assert!(validate_method_name("").is_err());
        assert!(validate_method_name("add").is_ok());
    }
}
