//! Error module for the JSON-RPC engine.
//!
//! This module provides a comprehensive error handling framework for the entire
//! crate, following Rust's idiomatic error handling patterns with explicit error
//! types, proper error propagation, and helpful context information.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

pub mod config;
pub mod protocol;

/// Result type alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Core error enum for the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors related to JSON-RPC envelope, dispatch, and framing handling.
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    /// IO errors that may occur during stream operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: EngineError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,

    /// Stack trace information if available.
    pub trace: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: EngineError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
            trace: None,
        }
    }

    /// Adds detail information to the error context.
    ///
    /// # Arguments
    ///
    /// * `details` - Additional context information to help with debugging
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Adds stack trace information to the error context.
    ///
    /// # Arguments
    ///
    /// * `trace` - Stack trace as a string
    pub fn with_trace<S: Into<String>>(mut self, trace: S) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
///
/// Callers own their reporter (typically an `Arc<dyn ErrorReporter>` held by
/// whichever component constructs the engine) rather than reaching for a
/// process-wide singleton.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    ///
    /// # Arguments
    ///
    /// * `context` - The error context to report
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            trace = context.trace.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// An error reporter that discards everything. Useful as a default when the
/// embedding application has not wired in its own sink.
#[derive(Default, Debug)]
pub struct NullErrorReporter;

impl ErrorReporter for NullErrorReporter {
    fn report(&self, _context: ErrorContext) {}
}

/// A small owned handle around an optional error reporter.
///
/// This replaces a process-global singleton: each `DispatchCtx` or engine
/// instance holds its own `ErrorReporting`, constructed once and shared via
/// `Arc` where needed, instead of mutable global state.
#[derive(Debug, Clone)]
pub struct ErrorReporting {
    reporter: Arc<dyn ErrorReporter>,
}

impl Default for ErrorReporting {
    fn default() -> Self {
        Self {
            reporter: Arc::new(NullErrorReporter),
        }
    }
}

impl ErrorReporting {
    /// Construct an error reporting handle backed by the given reporter.
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { reporter }
    }

    /// Report an error with context.
    ///
    /// # Arguments
    ///
    /// * `context` - The error context to report
    pub fn report(&self, context: ErrorContext) {
        self.reporter.report(context);
    }
}
