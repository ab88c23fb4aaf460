use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::authorization::{Credentials, TaskAuthorization};
use crate::config::CreatorDefaults;
use crate::error::{Result, TaskdefError};
use crate::payload::TaskPayload;
use crate::store::TaskStore;
use crate::task::Task;

// ─── Input shapes ────────────────────────────────────────────────────────────

/// Configuration for one task, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayloadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

/// Authorization as it arrives in a payload config: either canonical
/// credentials from an earlier validation, or a raw map carrying a `method`
/// discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorizationInput {
    Validated(Credentials),
    Raw(HashMap<String, serde_json::Value>),
}

// ─── TaskCreator ─────────────────────────────────────────────────────────────

/// Assembles and validates one task from a [`TaskConfig`] before handoff to
/// the persistence collaborator.
///
/// Validation is fail-fast with a fixed order: task-level fields at
/// construction, then payload presence, authorization, meta, storage, body.
/// The first violated precondition wins; nothing partial is ever attached.
/// A successful `validate` is memoized, so repeated calls return the built
/// task without re-running the sequence. The memo flag is unsynchronized;
/// one creator serves one caller at a time.
#[derive(Debug)]
pub struct TaskCreator {
    payload_config: Option<PayloadConfig>,
    task: Task,
    validated: bool,
}

impl TaskCreator {
    pub fn new(config: TaskConfig) -> Result<Self> {
        Self::with_defaults(config, &CreatorDefaults::default())
    }

    /// Like [`TaskCreator::new`], with config-layer defaults filling in
    /// `taskName`, `priority`, and `maxAttempts` when the config omits them.
    pub fn with_defaults(config: TaskConfig, defaults: &CreatorDefaults) -> Result<Self> {
        let TaskConfig {
            task_type,
            task_name,
            immediate,
            expires,
            priority,
            max_attempts,
            schedule,
            payload,
        } = config;

        let mut task = Task::new();
        match task_type {
            Some(task_type) if !task_type.is_empty() => {
                task.set_task_type(task_type);
            }
            _ => {
                return Err(TaskdefError::Validation(
                    "Task Type is mandatory and missing from the request.".to_string(),
                ))
            }
        }
        if let Some(task_name) = task_name.or_else(|| defaults.task_name.clone()) {
            task.set_task_name(task_name);
        }
        if let Some(immediate) = immediate {
            task.set_immediate(immediate);
        }
        if let Some(expires) = expires {
            task.set_expires(expires);
        }
        if let Some(priority) = priority.or(defaults.priority) {
            task.set_priority(priority)?;
        }
        if let Some(max_attempts) = max_attempts.or(defaults.max_attempts) {
            task.set_max_attempts(max_attempts)?;
        }
        if let Some(schedule) = schedule {
            task.set_schedule(schedule);
        }

        Ok(Self {
            payload_config: payload,
            task,
            validated: false,
        })
    }

    /// Validates the payload and attaches it to the task. Idempotent after
    /// the first success.
    pub fn validate(&mut self) -> Result<&Task> {
        if self.validated {
            return Ok(&self.task);
        }
        let config = self.payload_config.as_ref().ok_or_else(|| {
            TaskdefError::Validation("Task Payload is missing from the request.".to_string())
        })?;

        let mut payload = TaskPayload::new();

        if let Some(input) = &config.authorization {
            let credentials = resolve_authorization(input)?;
            tracing::debug!(method = credentials.method.as_str(), "authorization validated");
            payload.set_credentials(&credentials);
        }
        if let Some(meta) = &config.meta {
            payload.set_meta(meta.clone());
        }
        if let Some(storage) = &config.storage {
            payload.set_storage(storage.clone());
        }
        match &config.body {
            Some(body) if !body.is_empty() => {
                payload.set_body(body.clone());
            }
            _ => {
                return Err(TaskdefError::Validation(
                    "Payload body is missing. A valid payload body is required to create a task."
                        .to_string(),
                ))
            }
        }

        self.task.set_payload(&payload);
        self.validated = true;
        Ok(&self.task)
    }

    /// Validates, then hands the task to the persistence collaborator,
    /// returning the persisted task or propagating the failure.
    pub async fn create(&mut self, store: &dyn TaskStore) -> Result<Task> {
        self.validate()?;
        let persisted = store
            .save_task(self.task.clone())
            .await
            .map_err(TaskdefError::Store)?;
        tracing::debug!(task_id = %persisted.id, "task persisted");
        Ok(persisted)
    }

    /// Attaches an already-constructed task as a subtask of the root task.
    pub fn add_sub_task(&mut self, task: Task) -> &mut Self {
        self.task.add_sub_task(task);
        self
    }

    pub fn task(&self) -> &Task {
        &self.task
    }
}

/// Pre-validated credentials are reused as-is only while they report valid;
/// anything else goes through the validator matching the declared method.
fn resolve_authorization(input: &AuthorizationInput) -> Result<Credentials> {
    match input {
        AuthorizationInput::Validated(credentials) if credentials.is_valid() => {
            Ok(credentials.clone())
        }
        AuthorizationInput::Validated(credentials) => {
            TaskAuthorization::new(credentials.method, credentials.credentials.clone()).validate()
        }
        AuthorizationInput::Raw(raw) => TaskAuthorization::from_raw(raw.clone())?.validate(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
