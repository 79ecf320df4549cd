//! Validation layer for JSON-RPC request envelopes
//!
//! Sits at the transport boundary: a request with the wrong protocol version or
//! no method never reaches the dispatcher, and the transport answers it with
//! an HTTP-level rejection.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;
use tracing::warn;

use crate::{
    codec::jsonrpc::{JsonRpcRequest, JsonRpcResponse},
    protocol::error::A2AError,
};

/// Layer that validates JSON-RPC request envelopes
#[derive(Clone, Debug, Default)]
pub struct JsonRpcValidationLayer;

impl JsonRpcValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for JsonRpcValidationLayer {
    type Service = JsonRpcValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonRpcValidationService { inner }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone, Debug)]
pub struct JsonRpcValidationService<S> {
    inner: S,
}

impl<S> JsonRpcValidationService<S> {
    /// Validate a JSON-RPC request envelope
    fn validate_request(req: &JsonRpcRequest) -> Result<(), A2AError> {
        req.validate_envelope()?;

        match &req.id {
            serde_json::Value::Null
            | serde_json::Value::String(_)
            | serde_json::Value::Number(_) => Ok(()),
            _ => Err(A2AError::InvalidRequest(
                "id must be a string or a number".into(),
            )),
        }
    }
}

impl<S> Service<JsonRpcRequest> for JsonRpcValidationService<S>
where
    S: Service<JsonRpcRequest, Response = JsonRpcResponse, Error = A2AError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = JsonRpcResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: JsonRpcRequest) -> Self::Future {
        // Validate request before passing to inner service
        if let Err(e) = Self::validate_request(&req) {
            warn!(method = %req.method, error = %e, "rejected JSON-RPC request");
            return Box::pin(async move { Err(e) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
