use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::status::TaskStatus;
use crate::task::Task;

// ─── TaskRecord ──────────────────────────────────────────────────────────────

/// The document shape the persistence collaborator stores, field for field.
/// Unlike the in-memory [`Task`], children are held as identifier references
/// into the same collection, so `subtasks` here is the flattened id list and
/// `result` is the slot the execution layer fills in later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub task_type: String,
    pub task_name: String,
    pub subtasks: Vec<String>,
    pub has_child: bool,
    pub subtask_count: usize,
    pub payload: serde_json::Value,
    pub is_complete: bool,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    pub max_attempts: i64,
    pub attempts: i64,
    pub max_concurrency: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_task_of: Option<String>,
    pub immediate: bool,
    pub priority: i64,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_run_at: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<f64>,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            task_type: task.task_type.clone(),
            task_name: task.task_name.clone(),
            subtasks: task.subtasks_ref.clone(),
            has_child: task.has_child,
            subtask_count: task.subtask_count,
            payload: serde_json::to_value(&task.payload).unwrap_or(serde_json::Value::Null),
            is_complete: task.is_complete,
            progress: task.progress,
            expires: task.expires,
            max_attempts: task.max_attempts,
            attempts: task.attempts,
            max_concurrency: task.max_concurrency,
            child_task_of: task.child_task_of.clone(),
            immediate: task.immediate,
            priority: task.priority,
            status: task.status,
            result: None,
            dependencies: task.dependencies.clone(),
            schedule: task.schedule.clone(),
            meta: task.meta.clone(),
            scheduled_run_at: task.scheduled_run_at,
            cancelled_at: task.cancelled_at,
            enqueued_at: task.enqueued_at,
            started_at: task.started_at,
            completed_at: task.completed_at,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
