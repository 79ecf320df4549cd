//! Task lifecycle
//!
//! A `message/send` call is one turn on a task:
//!
//! ```text
//!                    ┌─ no source ─→ input-required ─→ completed
//! inbound message ───┤
//!                    └─ source ────→ working ─┬─ summary ─→ completed
//!                                             └─ error ───→ failed
//! ```
//!
//! Every state change is written to the store before the next step runs. A
//! turn holds the task's lock from start to finish, so two turns on the same
//! task never interleave.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    backend::Summarizer,
    extract::extract_source,
    protocol::{
        message::{Message, Part, Role},
        task::{Task, TaskState},
    },
    store::TaskStore,
};

/// Agent reply when a message carries nothing to process
pub const NO_SOURCE_PROMPT: &str =
    "Please send an audio file for me to transcribe and summarize. I support audio files from URLs.";

/// Drives tasks through their lifecycle
#[derive(Clone)]
pub struct TaskManager {
    store: TaskStore,
    summarizer: Arc<dyn Summarizer>,
}

impl TaskManager {
    pub fn new(store: TaskStore, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Run one turn for an inbound message and return the resulting task
    ///
    /// A `taskId` naming a stored task continues that task; any other
    /// `taskId` (or none) starts a new one. Processing failures end the turn
    /// in `failed` rather than returning an error.
    pub async fn send_message(&self, mut message: Message) -> Task {
        let task_id = non_empty(message.task_id.take()).unwrap_or_else(generate_id);
        let _guard = self.store.lock(&task_id).await;

        let mut task = match self.store.get(&task_id).await {
            Some(existing) => {
                if existing.is_terminal() {
                    info!(
                        task_id = %existing.id,
                        state = ?existing.status.state,
                        "starting a new turn on a finished task"
                    );
                }
                existing
            }
            None => {
                let context_id = non_empty(message.context_id.take()).unwrap_or_else(generate_id);
                Task::new(task_id.clone(), context_id)
            }
        };

        message.message_id = non_empty(message.message_id.take()).or_else(|| Some(generate_id()));
        message.task_id = Some(task.id.clone());
        message.context_id = Some(task.context_id.clone());

        info!(
            task_id = %task.id,
            context_id = %task.context_id,
            message_id = message.message_id.as_deref().unwrap_or_default(),
            parts = ?message.parts.iter().map(Part::kind).collect::<Vec<_>>(),
            "processing message"
        );

        let source = extract_source(&message.parts);
        task.push_history(message);

        match source {
            None => self.request_input(&mut task).await,
            Some(locator) => self.process(&mut task, &locator).await,
        }

        task
    }

    /// No source found: ask for one, then close the turn
    async fn request_input(&self, task: &mut Task) {
        info!(task_id = %task.id, "no content source in message");

        let prompt = agent_reply(task, NO_SOURCE_PROMPT);
        task.push_history(prompt.clone());
        task.transition(TaskState::InputRequired, Some(prompt.clone()));
        self.store.put(task.clone()).await;

        task.transition(TaskState::Completed, Some(prompt));
        self.store.put(task.clone()).await;
    }

    async fn process(&self, task: &mut Task, locator: &str) {
        info!(task_id = %task.id, locator, "summarizing content source");

        task.transition(TaskState::Working, None);
        self.store.put(task.clone()).await;

        let (state, reply) = match self.summarizer.summarize(locator).await {
            Ok(summary) => (TaskState::Completed, agent_reply(task, summary)),
            Err(err) => {
                error!(task_id = %task.id, locator, error = %err, "processing failed");
                let notice = format!(
                    "Sorry, I encountered an error processing the audio: {}",
                    err
                );
                (TaskState::Failed, agent_reply(task, notice))
            }
        };

        task.push_history(reply.clone());
        task.transition(state, Some(reply));
        self.store.put(task.clone()).await;

        if state == TaskState::Failed {
            warn!(task_id = %task.id, "task failed");
        } else {
            info!(task_id = %task.id, "task completed");
        }
    }
}

impl std::fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManager")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

fn agent_reply(task: &Task, text: impl Into<String>) -> Message {
    Message::builder()
        .role(Role::Agent)
        .part(Part::text(text))
        .message_id(generate_id())
        .task_id(task.id.clone())
        .context_id(task.context_id.clone())
        .build()
}

fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
