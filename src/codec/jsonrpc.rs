//! JSON-RPC 2.0 codec for A2A protocol
//!
//! Inbound requests arrive in JSON-RPC 2.0 envelopes. This module holds the
//! envelope types and decodes a request into a typed [`A2AOperation`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{
    error::{A2AError, A2AResult},
    message::Message,
    operation::{methods, A2AOperation},
};

/// The only protocol version accepted
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes used by the agent
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const SERVER_ERROR: i64 = -32000;
    pub const TASK_NOT_FOUND: i64 = -32001;
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub params: Value,

    /// String or number; `null` when absent
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    /// Create a JSON-RPC 2.0 request
    pub fn new(method: impl Into<String>, params: Value, id: impl Into<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }

    /// Check the envelope itself, independent of the method
    pub fn validate_envelope(&self) -> A2AResult<()> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(A2AError::InvalidRequest(format!(
                "Invalid JSON-RPC protocol version: expected {}, got {:?}",
                JSONRPC_VERSION, self.jsonrpc
            )));
        }
        if self.method.trim().is_empty() {
            return Err(A2AError::InvalidRequest("Method cannot be empty".into()));
        }
        Ok(())
    }

    /// Decode the method and params into a typed operation
    pub fn decode_operation(&self) -> A2AResult<A2AOperation> {
        match self.method.as_str() {
            methods::MESSAGE_SEND => decode_send_message(&self.params),
            methods::TASK_GET => {
                let params: TaskGetParams = decode_params(&self.params)?;
                match params.task_id {
                    Some(task_id) if !task_id.is_empty() => Ok(A2AOperation::GetTask { task_id }),
                    _ => Err(A2AError::InvalidParams("taskId required".into())),
                }
            }
            methods::TASK_LIST => {
                let params: TaskListParams = decode_params(&self.params)?;
                Ok(A2AOperation::ListTasks {
                    context_id: params.context_id.filter(|c| !c.is_empty()),
                    limit: params.limit,
                    offset: params.offset,
                })
            }
            other => Err(A2AError::UnknownMethod(other.to_string())),
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,

    pub id: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Wrap a successful result
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Wrap an error object
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Wrap an [`A2AError`], mapping it to its JSON-RPC code
    pub fn from_error(id: Value, error: &A2AError) -> Self {
        Self::error(id, error.to_rpc_error())
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct TaskGetParams {
    #[serde(rename = "taskId", alias = "id")]
    task_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TaskListParams {
    #[serde(rename = "contextId")]
    context_id: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

/// `message/send` accepts the message itself or `{"message": {...}}`
fn decode_send_message(params: &Value) -> A2AResult<A2AOperation> {
    let raw = match params.get("message") {
        Some(inner) if inner.is_object() => inner,
        _ => params,
    };

    let message: Message = serde_json::from_value(raw.clone())
        .map_err(|e| A2AError::InvalidParams(e.to_string()))?;

    if message.parts.is_empty() {
        return Err(A2AError::InvalidParams(
            "Message must have at least one part".into(),
        ));
    }

    Ok(A2AOperation::SendMessage { message })
}

fn decode_params<T>(params: &Value) -> A2AResult<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match params {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(params.clone())
            .map_err(|e| A2AError::InvalidParams(e.to_string())),
        _ => Err(A2AError::InvalidParams("params must be an object".into())),
    }
}
