//! Mauka RPC Engine
//!
//! This library implements a standalone JSON-RPC 2.0 engine: message
//! types, a tolerant parser and a composer, an arity-generic handler
//! binder and dispatcher, and the byte-stream framing and loop that drive
//! a pipeline over a transport.
//!
//! # Architecture
//!
//! - Strict component boundaries: parsing, dispatch, and framing are
//!   independent and composable.
//! - No mutable global state: configuration and error reporting are owned
//!   values passed by the embedder, not process-wide singletons.
//! - Async-first, with handlers stored as boxed futures rather than a
//!   dynamic dispatch trait object hierarchy.

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod transport;

/// Version information for the Mauka RPC engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
