use async_trait::async_trait;

use crate::error::Result;
use crate::payload::TaskPayload;
use crate::status::TaskStatus;
use crate::task::Task;

// ─── Worker ──────────────────────────────────────────────────────────────────

/// Extension point the external dispatch layer implements for each task type.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&mut self) -> Result<()>;
}

// ─── TaskWorker ──────────────────────────────────────────────────────────────

/// Execution-side view of one task: working progress/status separate from the
/// persisted entity, plus the accessors a `run` implementation needs.
#[derive(Debug, Clone)]
pub struct TaskWorker {
    task: Task,
    progress: u8,
    is_complete: bool,
    status: TaskStatus,
}

impl TaskWorker {
    pub fn new(task: Task) -> Self {
        let status = task.status;
        Self {
            task,
            progress: 0,
            is_complete: false,
            status,
        }
    }

    /// Progress values above 100 are ignored, preserving the prior value.
    pub fn set_progress(&mut self, progress: u8) {
        if progress <= 100 {
            self.progress = progress;
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn set_complete(&mut self) {
        self.is_complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn task_id(&self) -> &str {
        &self.task.id
    }

    pub fn parent_task_id(&self) -> Option<&str> {
        self.task.child_task_of.as_deref()
    }

    pub fn payload(&self) -> &TaskPayload {
        &self.task.payload
    }

    pub fn has_child_task(&self) -> bool {
        self.task.has_child
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
