//! Protocol error module.
//!
//! This module defines error types that may occur during JSON-RPC protocol
//! operations: envelope validation, dispatch binding, and stream framing.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Error when the JSON-RPC message is invalid.
    #[error("Invalid JSON-RPC message: {0}")]
    InvalidMessage(String),

    /// Error when the JSON-RPC request has an invalid method.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Error when the JSON-RPC request has invalid parameters.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Error when the protocol version is unsupported.
    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(String),

    /// Error when a required field is missing from the message.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Error when a frame exceeds the configured maximum size.
    #[error("Frame size exceeds maximum allowed: {size} > {max_size}")]
    MessageTooLarge {
        /// The actual size of the frame in bytes
        size: usize,
        /// The maximum allowed size in bytes
        max_size: usize,
    },

    /// Error when the response cannot be correlated with a request.
    #[error("Cannot correlate response to request: {0}")]
    CorrelationError(String),

    /// Error when a frame's header block is malformed (Content-Length framing).
    #[error("Invalid frame header: {0}")]
    InvalidHeader(String),

    /// Error when a mandatory `Content-Length` header is missing.
    #[error("Missing Content-Length header")]
    MissingContentLength,

    /// Error when the stream ends in the middle of a frame (header block or body).
    #[error("Unexpected end of stream while reading a frame")]
    UnexpectedEof,

    /// Other protocol errors.
    #[error("Protocol error: {0}")]
    Other(String),
}
