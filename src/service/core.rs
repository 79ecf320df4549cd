//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use serde_json::Value;
use tower_service::Service;
use tracing::{debug, info, warn};

use crate::{
    backend::Summarizer,
    codec::jsonrpc::{JsonRpcRequest, JsonRpcResponse},
    protocol::{
        error::{A2AError, A2AResult},
        operation::A2AOperation,
        task::TaskListResponse,
    },
    service::lifecycle::TaskManager,
    store::TaskStore,
};

/// JSON-RPC dispatcher for the A2A methods
///
/// This service implements the Tower `Service` trait. Every call resolves to a
/// JSON-RPC response: handler failures become error envelopes, and processing
/// failures are recorded on the task and returned as ordinary results. The
/// `Err` side is reserved for layers in front of it.
#[derive(Clone, Debug)]
pub struct A2AServerService {
    manager: TaskManager,
}

impl A2AServerService {
    /// Create a new dispatcher over a task manager
    pub fn new(manager: TaskManager) -> Self {
        Self { manager }
    }

    /// Create a dispatcher from a store and a summarizer
    pub fn from_parts(store: TaskStore, summarizer: Arc<dyn Summarizer>) -> Self {
        Self::new(TaskManager::new(store, summarizer))
    }

    pub fn store(&self) -> &TaskStore {
        self.manager.store()
    }

    /// Route a request by method and wrap the outcome in a response envelope
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!(method = %request.method, id = %request.id, "received RPC request");

        let outcome = self.execute(&request).await;
        match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(err) => {
                warn!(method = %request.method, id = %request.id, error = %err, "RPC error");
                JsonRpcResponse::from_error(request.id, &err)
            }
        }
    }

    async fn execute(&self, request: &JsonRpcRequest) -> A2AResult<Value> {
        let operation = request.decode_operation()?;
        debug!(
            method = operation.method(),
            read_only = operation.is_read_only(),
            "decoded operation"
        );

        match operation {
            A2AOperation::SendMessage { message } => {
                let task = self.manager.send_message(message).await;
                Ok(serde_json::to_value(task)?)
            }
            A2AOperation::GetTask { task_id } => {
                let task = self.store().get(&task_id).await;
                let task = task.ok_or(A2AError::TaskNotFound { task_id })?;
                Ok(serde_json::to_value(task)?)
            }
            A2AOperation::ListTasks {
                context_id,
                limit,
                offset,
            } => {
                let tasks = self.store().list(context_id.as_deref()).await;
                let total = tasks.len();
                let tasks = tasks
                    .into_iter()
                    .skip(offset.unwrap_or(0))
                    .take(limit.unwrap_or(usize::MAX))
                    .collect();
                Ok(serde_json::to_value(TaskListResponse { tasks, total })?)
            }
        }
    }
}

impl Service<JsonRpcRequest> for A2AServerService {
    type Response = JsonRpcResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // No backpressure; load shedding belongs to the transport
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: JsonRpcRequest) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.dispatch(req).await) })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tower::ServiceExt;

    use crate::{
        backend::{MockSummarizer, ProcessingError},
        protocol::task::{Task, TaskState},
    };

    use super::*;

    fn service(summarizer: MockSummarizer) -> A2AServerService {
        A2AServerService::from_parts(TaskStore::new(), Arc::new(summarizer))
    }

    fn idle() -> A2AServerService {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);
        service(summarizer)
    }

    #[tokio::test]
    async fn test_send_message_returns_task() {
        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .returning(|_| Ok("hello".to_string()));
        let service = service(summarizer);

        let request = JsonRpcRequest::new(
            "message/send",
            json!({"parts": [{"kind": "file", "url": "http://x/a.mp3"}]}),
            1,
        );
        let response = service.clone().oneshot(request).await.unwrap();

        assert_eq!(response.id, json!(1));
        assert!(!response.is_error());
        let task: Task = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.history.last().unwrap().text(), "hello");
    }

    #[tokio::test]
    async fn test_processing_failure_is_not_an_rpc_error() {
        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .returning(|_| Err(ProcessingError::from("timeout")));
        let service = service(summarizer);

        let request = JsonRpcRequest::new(
            "message/send",
            json!({"parts": [{"kind": "file", "url": "http://x/a.mp3"}]}),
            1,
        );
        let response = service.dispatch(request).await;

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["status"]["state"], "failed");
    }

    #[tokio::test]
    async fn test_invalid_send_params() {
        let response = idle()
            .dispatch(JsonRpcRequest::new("message/send", json!({"text": "x"}), 5))
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(response.id, json!(5));
    }

    #[tokio::test]
    async fn test_get_task() {
        let service = idle();
        let mut task = Task::new("t-1", "ctx-1");
        task.transition(TaskState::Completed, None);
        service.store().put(task.clone()).await;

        let response = service
            .dispatch(JsonRpcRequest::new("task/get", json!({"taskId": "t-1"}), "a"))
            .await;

        let fetched: Task = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(fetched, task);
    }

    #[tokio::test]
    async fn test_get_task_errors() {
        let service = idle();

        let response = service
            .dispatch(JsonRpcRequest::new("task/get", json!({"taskId": "nope"}), 2))
            .await;
        assert_eq!(response.error.unwrap().code, -32001);

        let response = service
            .dispatch(JsonRpcRequest::new("task/get", json!({}), 3))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_list_tasks_filter_and_pagination() {
        let service = idle();
        for (id, ctx) in [("t-1", "a"), ("t-2", "b"), ("t-3", "a"), ("t-4", "a")] {
            service.store().put(Task::new(id, ctx)).await;
        }

        let response = service
            .dispatch(JsonRpcRequest::new("task/list", json!({}), 1))
            .await;
        let list: TaskListResponse = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(list.total, 4);
        assert_eq!(list.tasks.len(), 4);

        let response = service
            .dispatch(JsonRpcRequest::new(
                "task/list",
                json!({"contextId": "a", "offset": 1, "limit": 1}),
                2,
            ))
            .await;
        let list: TaskListResponse = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(list.total, 3);
        assert_eq!(list.tasks.len(), 1);
        assert_eq!(list.tasks[0].id, "t-3");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = idle()
            .dispatch(JsonRpcRequest::new("tasks/cancel", json!({}), 99))
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "Unknown method: tasks/cancel");
        assert_eq!(response.jsonrpc, "2.0");
    }
}
