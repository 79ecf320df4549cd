//! Error types for A2A protocol operations

use thiserror::Error;

use crate::codec::jsonrpc::{error_codes, JsonRpcError};

/// Main error type for A2A protocol operations
///
/// Every variant is scoped to a single request. Failures of the processing
/// backend are not represented here; they are recorded on the task instead.
#[derive(Debug, Error)]
pub enum A2AError {
    /// Request body is not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Envelope violates JSON-RPC 2.0 (wrong version, missing method)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method name is not served by this agent
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Params are missing or malformed for the method
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Task not found error
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl A2AError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i64 {
        match self {
            A2AError::Parse(_) => error_codes::PARSE_ERROR,
            A2AError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            A2AError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            A2AError::TaskNotFound { .. } => error_codes::TASK_NOT_FOUND,
            A2AError::UnknownMethod(_) | A2AError::Serialization(_) | A2AError::Other(_) => {
                error_codes::SERVER_ERROR
            }
        }
    }

    /// Convert into a JSON-RPC error object
    pub fn to_rpc_error(&self) -> JsonRpcError {
        JsonRpcError::new(self.code(), self.to_string())
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<&str> for A2AError {
    fn from(s: &str) -> Self {
        A2AError::Other(s.to_string())
    }
}

impl From<String> for A2AError {
    fn from(s: String) -> Self {
        A2AError::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(A2AError::UnknownMethod("x".into()).code(), -32000);
        assert_eq!(A2AError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(
            A2AError::TaskNotFound {
                task_id: "t".into()
            }
            .code(),
            -32001
        );
        assert_eq!(A2AError::InvalidRequest("x".into()).code(), -32600);
        assert_eq!(A2AError::Parse("x".into()).code(), -32700);
        assert_eq!(A2AError::from("boom").code(), -32000);
    }

    #[test]
    fn test_unknown_method_message() {
        let err = A2AError::UnknownMethod("tasks/cancel".into()).to_rpc_error();
        assert_eq!(err.code, -32000);
        assert_eq!(err.message, "Unknown method: tasks/cancel");
        assert!(err.data.is_none());
    }
}
