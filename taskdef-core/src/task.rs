use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskdefError};
use crate::payload::TaskPayload;
use crate::status::TaskStatus;

pub const DEFAULT_TASK_TYPE: &str = "main";
pub const DEFAULT_TASK_NAME: &str = "task";

// ─── Task ────────────────────────────────────────────────────────────────────

/// A unit of schedulable work: identity, type, status, scheduling fields,
/// an owned subtask tree, and the payload its executor consumes.
///
/// Children are owned through `subtasks`; `subtasks_ref` and `child_task_of`
/// are plain identifier back-references kept for lookup without loading the
/// full tree. `has_child` and `subtask_count` are denormalized and recomputed
/// on every subtask mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", default = "generate_id")]
    pub id: String,
    #[serde(default = "default_task_type")]
    pub task_type: String,
    #[serde(default = "default_task_name")]
    pub task_name: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub subtasks: Vec<Task>,
    #[serde(default)]
    pub subtasks_ref: Vec<String>,
    #[serde(default)]
    pub has_child: bool,
    #[serde(default)]
    pub subtask_count: usize,
    #[serde(default)]
    pub payload: TaskPayload,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default = "default_one")]
    pub max_attempts: i64,
    #[serde(default)]
    pub attempts: i64,
    #[serde(default = "default_one")]
    pub max_concurrency: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_task_of: Option<String>,
    #[serde(default = "now_millis")]
    pub created_at: f64,
    #[serde(default = "now_millis")]
    pub updated_at: f64,
    #[serde(default)]
    pub immediate: bool,
    #[serde(default = "default_one")]
    pub priority: i64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_run_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<f64>,
}

fn generate_id() -> String {
    ulid::Ulid::new().to_string()
}

fn default_task_type() -> String {
    DEFAULT_TASK_TYPE.to_string()
}

fn default_task_name() -> String {
    DEFAULT_TASK_NAME.to_string()
}

fn default_one() -> i64 {
    1
}

fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_millis() as f64
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}

impl Task {
    pub fn new() -> Self {
        Self::with_id(generate_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            task_type: default_task_type(),
            task_name: default_task_name(),
            status: TaskStatus::Enqueued,
            subtasks: Vec::new(),
            subtasks_ref: Vec::new(),
            has_child: false,
            subtask_count: 0,
            payload: TaskPayload::new(),
            is_complete: false,
            progress: 0,
            expires: None,
            max_attempts: 1,
            attempts: 0,
            max_concurrency: 1,
            child_task_of: None,
            created_at: now,
            updated_at: now,
            immediate: false,
            priority: 1,
            dependencies: Vec::new(),
            schedule: None,
            meta: None,
            scheduled_run_at: None,
            cancelled_at: None,
            enqueued_at: None,
            started_at: None,
            completed_at: None,
        }
    }

    // ─── Setters ─────────────────────────────────────────────────────────

    pub fn set_status(&mut self, status: TaskStatus) -> &mut Self {
        self.status = status;
        self
    }

    pub fn set_task_type(&mut self, task_type: impl Into<String>) -> &mut Self {
        self.task_type = task_type.into();
        self
    }

    pub fn set_task_name(&mut self, task_name: impl Into<String>) -> &mut Self {
        self.task_name = task_name.into();
        self
    }

    /// Cron expression for periodic tasks; a task without a schedule runs once.
    pub fn set_schedule(&mut self, schedule: impl Into<String>) -> &mut Self {
        self.schedule = Some(schedule.into());
        self
    }

    pub fn set_parent_task(&mut self, id: impl Into<String>) -> &mut Self {
        self.child_task_of = Some(id.into());
        self
    }

    pub fn set_immediate(&mut self, flag: bool) -> &mut Self {
        self.immediate = flag;
        self
    }

    pub fn set_meta(&mut self, meta: HashMap<String, serde_json::Value>) -> &mut Self {
        self.meta = Some(meta);
        self
    }

    pub fn set_expires(&mut self, expires: f64) -> &mut Self {
        self.expires = Some(expires);
        self
    }

    pub fn set_priority(&mut self, priority: i64) -> Result<&mut Self> {
        if priority >= 1 {
            self.priority = priority;
            Ok(self)
        } else {
            Err(TaskdefError::Validation(
                "Priority must be a number greater than or equal to 1.".to_string(),
            ))
        }
    }

    pub fn set_max_attempts(&mut self, max_attempts: i64) -> Result<&mut Self> {
        if max_attempts >= 1 {
            self.max_attempts = max_attempts;
            Ok(self)
        } else {
            Err(TaskdefError::Validation(
                "MaxAttempts must be a number greater than or equal to 1.".to_string(),
            ))
        }
    }

    /// Progress values above 100 are ignored, preserving the prior value.
    pub fn set_progress(&mut self, progress: u8) -> &mut Self {
        if progress <= 100 {
            self.progress = progress;
        }
        self
    }

    // ─── Composition ─────────────────────────────────────────────────────

    /// Adopts `subtask` as a child: the child's parent back-reference is set
    /// to this task's id and the denormalized child index is recomputed.
    pub fn add_sub_task(&mut self, mut subtask: Task) -> &mut Self {
        subtask.set_parent_task(self.id.clone());
        self.subtasks_ref.push(subtask.id.clone());
        self.subtasks.push(subtask);
        self.has_child = true;
        self.subtask_count = self.subtasks.len();
        self
    }

    /// Stores a structural deep copy of `payload`; the caller's payload stays
    /// independent of the task after this call.
    pub fn set_payload(&mut self, payload: &TaskPayload) -> &mut Self {
        self.payload = payload.clone();
        self
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Marks the task complete. The completion timestamp is set at most once;
    /// repeating the transition never rewrites it.
    pub fn set_complete(&mut self) -> &mut Self {
        self.is_complete = true;
        self.status = TaskStatus::Completed;
        self.progress = 100;
        self.completed_at.get_or_insert_with(now_millis);
        self
    }

    pub fn cancel(&mut self) -> &mut Self {
        self.status = TaskStatus::Cancelled;
        self.cancelled_at.get_or_insert_with(now_millis);
        self
    }

    pub fn mark_enqueued(&mut self) -> &mut Self {
        self.status = TaskStatus::Enqueued;
        self.enqueued_at.get_or_insert_with(now_millis);
        self
    }

    pub fn mark_started(&mut self) -> &mut Self {
        self.status = TaskStatus::Running;
        self.started_at.get_or_insert_with(now_millis);
        self
    }

    // ─── Deserialization ─────────────────────────────────────────────────

    /// Reconstructs a task from its JSON-shaped form. Total over missing
    /// fields: everything absent gets the same default the constructor would
    /// produce, nested subtasks are rebuilt recursively, and the denormalized
    /// child index is recomputed where the document omitted it.
    pub fn from_json(value: serde_json::Value) -> Result<Task> {
        let mut task: Task = serde_json::from_value(value)
            .map_err(|err| TaskdefError::BadRequest(format!("Malformed task document: {err}")))?;
        task.normalize_after_deserialize();
        Ok(task)
    }

    fn normalize_after_deserialize(&mut self) {
        for subtask in &mut self.subtasks {
            subtask.normalize_after_deserialize();
        }
        if self.subtask_count == 0 {
            self.subtask_count = self.subtasks.len();
        }
        if !self.has_child {
            self.has_child = !self.subtasks.is_empty();
        }
        self.payload.normalize();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
