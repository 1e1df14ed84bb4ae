// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Client-side JSON-RPC 2.0 request/response correlation.
//!
//! `RequestResponseCorrelator` tracks this engine's own outstanding requests
//! by `RpcId` and resolves them against inbound `RpcResponse`s, with
//! per-request or default timeouts, cancellation, and periodic cleanup of
//! timed-out entries. It has no knowledge of transport; it is the concrete
//! `ResponseDispatch` an embedding client typically plugs into
//! `ResponsePipeline`/`MessagePipeline`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{oneshot, RwLock};
use tokio::time::timeout;

use super::dispatch::ResponseDispatch;
use super::error::{Error, ErrorCode, RpcError, Result};
use super::types::{RpcId, RpcRequest, RpcResponse};

/// Default timeout for waiting for a response.
const DEFAULT_TIMEOUT_MS: u64 = 30000; // 30 seconds

/// Error indicating a correlation issue.
#[derive(Debug, thiserror::Error)]
pub enum CorrelationError {
    /// No response was received within the timeout period.
    #[error("Request timed out waiting for response")]
    Timeout,

    /// The response channel was closed before a response was received.
    #[error("Response channel closed")]
    ChannelClosed,

    /// The request was canceled.
    #[error("Request was canceled")]
    Canceled,
}

/// A pending request awaiting correlation with a response.
#[derive(Debug)]
struct PendingRequest {
    /// The time when the request was sent.
    timestamp: Instant,

    /// The sender half of the oneshot channel for this request.
    response_sender: oneshot::Sender<RpcResponse>,

    /// Timeout duration for this request.
    timeout_duration: Duration,
}

/// Manages correlation between this engine's outbound requests and inbound
/// responses.
///
/// The correlator maintains a registry of pending requests keyed by
/// `RpcId`, allowing responses to be matched to their originating requests.
/// Its internal state is locked (`tokio::sync::RwLock`) because it is
/// explicitly meant to be shared across a client's concurrent callers,
/// unlike `RpcDispatcher`, which leaves locking to the caller.
#[derive(Debug, Clone)]
pub struct RequestResponseCorrelator {
    /// Map of request IDs to pending request data.
    pending_requests: Arc<RwLock<HashMap<RpcId, PendingRequest>>>,

    /// Next sequential ID to use for requests that don't specify one.
    next_id: Arc<Mutex<i64>>,

    /// Default timeout duration for requests.
    default_timeout: Duration,
}

impl Default for RequestResponseCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestResponseCorrelator {
    /// Creates a new request/response correlator with default settings.
    pub fn new() -> Self {
        Self {
            pending_requests: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Sets the default timeout for all requests.
    pub fn with_default_timeout(mut self, timeout_ms: u64) -> Self {
        self.default_timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Assigns a new ID to a request if it doesn't already have an
    /// addressable one.
    ///
    /// Notifications (`RpcId::None`) are left untouched: they don't expect
    /// responses and must not be given an id.
    pub fn prepare_request(&self, mut request: RpcRequest) -> RpcRequest {
        if request.is_notification() || request.id.is_addressable() {
            return request;
        }

        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        request.id = RpcId::Num(id);
        request
    }

    /// Registers a request for correlation with its future response.
    ///
    /// Returns a future that resolves when the corresponding response is
    /// received, or is dropped if the request times out or is canceled.
    pub async fn register_request(
        &self,
        request: &RpcRequest,
        timeout_ms: Option<u64>,
    ) -> Result<oneshot::Receiver<RpcResponse>> {
        if !request.id.is_addressable() {
            return Err(Error::from(RpcError::new(
                ErrorCode::InvalidRequest,
                "Request must have an addressable id for response correlation",
            )));
        }

        let (tx, rx) = oneshot::channel();

        let timeout_duration = timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);

        let pending_request = PendingRequest {
            timestamp: Instant::now(),
            response_sender: tx,
            timeout_duration,
        };

        let mut pending_requests = self.pending_requests.write().await;
        pending_requests.insert(request.id.clone(), pending_request);

        Ok(rx)
    }

    /// Correlates a response with its original request.
    ///
    /// Returns `true` if the response was successfully correlated with a
    /// pending request, or `false` if no matching request was found.
    pub async fn correlate_response(&self, response: RpcResponse) -> bool {
        let id = response.id.clone();

        let response_sender = {
            let mut pending_requests = self.pending_requests.write().await;
            pending_requests.remove(&id).map(|req| req.response_sender)
        };

        if let Some(sender) = response_sender {
            let _ = sender.send(response);
            true
        } else {
            false
        }
    }

    /// Convenience method that registers a request and waits for its
    /// response, handling timeout errors automatically.
    pub async fn send_request_and_wait(
        &self,
        request: &RpcRequest,
        timeout_ms: Option<u64>,
    ) -> Result<RpcResponse> {
        let rx = self.register_request(request, timeout_ms).await?;

        let timeout_duration = timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);

        match timeout(timeout_duration, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(Error::from(RpcError::new(
                ErrorCode::InternalError,
                "Response channel closed unexpectedly",
            ))),
            Err(_) => {
                let mut pending_requests = self.pending_requests.write().await;
                pending_requests.remove(&request.id);

                Err(Error::from(RpcError::new(
                    ErrorCode::InternalError,
                    "Request timed out waiting for response",
                )))
            }
        }
    }

    /// Cancels a pending request, causing its future to resolve with a cancellation error.
    pub async fn cancel_request(&self, id: &RpcId) -> bool {
        let mut pending_requests = self.pending_requests.write().await;
        if let Some(request) = pending_requests.remove(id) {
            let _ = request.response_sender.send(RpcResponse::error(
                id.clone(),
                RpcError::new(ErrorCode::RequestCancelled, "Request was canceled"),
            ));
            true
        } else {
            false
        }
    }

    /// Cleans up timed-out requests from the pending requests map.
    ///
    /// Returns the number of requests that were cleaned up.
    pub async fn cleanup_timed_out_requests(&self) -> usize {
        let mut pending_requests = self.pending_requests.write().await;
        let now = Instant::now();

        let timed_out: Vec<RpcId> = pending_requests
            .iter()
            .filter_map(|(id, req)| {
                if now.duration_since(req.timestamp) > req.timeout_duration {
                    Some(id.clone())
                } else {
                    None
                }
            })
            .collect();

        for id in &timed_out {
            if let Some(req) = pending_requests.remove(id) {
                let _ = req.response_sender.send(RpcResponse::error(
                    id.clone(),
                    RpcError::new(ErrorCode::RequestCancelled, "Request timed out"),
                ));
            }
        }

        timed_out.len()
    }
}

impl ResponseDispatch for RequestResponseCorrelator {
    fn dispatch(&self, resp: &RpcResponse) {
        let correlator = self.clone();
        let resp = resp.clone();
        tokio::spawn(async move {
            correlator.correlate_response(resp).await;
        });
    }
}
