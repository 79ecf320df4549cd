//! In-memory task store
//!
//! Process-lifetime registry of tasks keyed by id. Iteration follows insertion
//! order; replacing a task keeps its original position. There is no eviction
//! and nothing survives a restart.

use std::{collections::HashMap, sync::Arc};

use indexmap::IndexMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::protocol::task::Task;

/// Shared handle to the task registry
///
/// Cloning is cheap; all clones see the same tasks. Construct one at startup and
/// hand it to the services that need it.
#[derive(Clone, Default)]
pub struct TaskStore {
    tasks: Arc<RwLock<IndexMap<String, Task>>>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, replacing any task with the same id
    pub async fn put(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task);
    }

    /// Snapshot of the task with `id`
    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    /// Tasks in insertion order, optionally only those in `context_id`
    pub async fn list(&self, context_id: Option<&str>) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .values()
            .filter(|task| context_id.map_or(true, |ctx| task.context_id == ctx))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Acquire the update lock for `task_id`
    ///
    /// Holders of the guard are the only writers of that task; a second caller
    /// waits until the guard is dropped.
    pub async fn lock(&self, task_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(task_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore").finish_non_exhaustive()
    }
}
