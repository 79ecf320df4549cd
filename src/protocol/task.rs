//! A2A task types and lifecycle states

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// A task in the A2A protocol
///
/// A task tracks one conversational exchange: the messages exchanged so far and
/// the current state of the work. The history is append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Context (conversation) the task belongs to
    #[serde(rename = "contextId")]
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Every message of the exchange, in the order it was appended
    #[serde(default)]
    pub history: Vec<Message>,

    /// Object discriminator, always `"task"`
    #[serde(default)]
    pub kind: TaskKind,
}

impl Task {
    /// Create a new task in the `submitted` state with an empty history
    pub fn new(id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            status: TaskStatus::new(TaskState::Submitted),
            history: Vec::new(),
            kind: TaskKind::Task,
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Move the task to `state`, stamping the status with the current time
    pub fn transition(&mut self, state: TaskState, message: Option<Message>) {
        self.status = TaskStatus {
            state,
            message,
            timestamp: now_timestamp(),
        };
    }

    /// Append a message to the history
    pub fn push_history(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Builder-style variant of [`Task::push_history`]
    pub fn with_history_message(mut self, message: Message) -> Self {
        self.push_history(message);
        self
    }

    /// The most recently appended message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }
}

/// Current status of a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,

    /// Agent message associated with the latest transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// RFC 3339 time of the latest transition
    pub timestamp: String,
}

impl TaskStatus {
    /// Create a status in `state`, stamped with the current time
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: now_timestamp(),
        }
    }
}

/// Task state in the A2A protocol lifecycle
///
/// The full protocol vocabulary is kept for compatibility. This agent only
/// produces `working`, `input-required`, `completed` and `failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received and is queued for processing
    Submitted,

    /// Task is currently being processed
    Working,

    /// Task requires additional input from the client
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task was cancelled by the client
    Canceled,

    /// Task failed with an error
    Failed,

    /// Task was rejected by the agent
    Rejected,

    /// Task requires authentication or authorization
    AuthRequired,

    /// State could not be determined
    Unknown,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }
}

/// Discriminator carried by every serialized task
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Task,
}

/// Result of `task/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskListResponse {
    /// Tasks in insertion order
    pub tasks: Vec<Task>,

    /// Number of tasks matching the filter, before pagination
    pub total: usize,
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
