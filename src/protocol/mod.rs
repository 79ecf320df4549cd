//! Core A2A protocol types and definitions

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, AgentProvider, AgentSkill};
pub use error::{A2AError, A2AResult};
pub use message::{Message, Part, Role};
pub use operation::A2AOperation;
pub use task::{Task, TaskListResponse, TaskState, TaskStatus};
