use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::task::Task;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

// ─── TaskStore ───────────────────────────────────────────────────────────────

/// The persistence collaborator. Implementations live outside this crate
/// (database adapters, queue backends); the in-memory store below exists for
/// tests and embedding.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists the task and returns the stored representation.
    async fn save_task(&self, task: Task) -> Result<Task, StoreError>;

    async fn get_task(&self, task_id: &str) -> Result<Option<Task>, StoreError>;
}

// ─── MemoryTaskStore ─────────────────────────────────────────────────────────

pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn save_task(&self, task: Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().unwrap();
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().unwrap();
        Ok(tasks.get(task_id).cloned())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
