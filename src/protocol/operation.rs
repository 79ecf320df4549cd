//! A2A protocol operations

use super::message::Message;

/// JSON-RPC method names served by the agent
pub mod methods {
    pub const MESSAGE_SEND: &str = "message/send";
    pub const TASK_GET: &str = "task/get";
    pub const TASK_LIST: &str = "task/list";
}

/// A2A protocol operations
///
/// Each variant is a decoded, validated JSON-RPC call. Decoding happens in
/// [`crate::codec::jsonrpc`]; execution in [`crate::service::A2AServerService`].
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Send a message to the agent, creating or continuing a task
    SendMessage {
        /// The inbound message
        message: Message,
    },

    /// Get a task by ID
    GetTask {
        /// The task ID to retrieve
        task_id: String,
    },

    /// List tasks with optional filtering
    ListTasks {
        /// Only tasks in this context
        context_id: Option<String>,

        /// Maximum number of tasks to return
        limit: Option<usize>,

        /// Number of matching tasks to skip
        offset: Option<usize>,
    },
}

impl A2AOperation {
    /// The JSON-RPC method name of this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage { .. } => methods::MESSAGE_SEND,
            A2AOperation::GetTask { .. } => methods::TASK_GET,
            A2AOperation::ListTasks { .. } => methods::TASK_LIST,
        }
    }

    /// Check if this operation only reads the task store
    pub fn is_read_only(&self) -> bool {
        !matches!(self, A2AOperation::SendMessage { .. })
    }
}
