// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! A small logging boundary the engine dispatches through, independent of
//! any particular backend. `TracingLogger` bridges it into the crate's own
//! `tracing` setup; embedders may supply their own `Logger` instead.

use std::fmt;

/// A pluggable sink for the engine's lifecycle events (stream start/stop,
/// per-operation notices).
pub trait Logger: Send + Sync + fmt::Debug {
    /// Called once when a named source (a stream loop, a pipeline) starts.
    fn start(&self, source: &str);

    /// Called for a discrete operation within a source.
    fn log(&self, source: &str, operation: &str, message: &str);

    /// Called once when a named source stops.
    fn stop(&self, source: &str);
}

/// A `Logger` that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn start(&self, _source: &str) {}
    fn log(&self, _source: &str, _operation: &str, _message: &str) {}
    fn stop(&self, _source: &str) {}
}

/// A `Logger` that forwards to the crate's `tracing` setup. This is the
/// default used by `EngineConfig::default()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn start(&self, source: &str) {
        tracing::info!(source, "started");
    }

    fn log(&self, source: &str, operation: &str, message: &str) {
        tracing::debug!(source, operation, message);
    }

    fn stop(&self, source: &str) {
        tracing::info!(source, "stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_logger_does_not_panic() {
        let logger = NopLogger;
        logger.start("test");
        logger.log("test", "op", "message");
        logger.stop("test");
    }
}
