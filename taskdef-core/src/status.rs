use serde::{Deserialize, Serialize};

// ─── TaskStatus ──────────────────────────────────────────────────────────────

/// Closed enumeration of task states. A freshly constructed task starts out
/// as [`TaskStatus::Enqueued`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    Enqueued,
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Paused,
    Waiting,
    Delayed,
    Error,
    Partial,
}

/// Statuses from which a task never leaves on its own.
pub const TERMINAL_STATUSES: &[TaskStatus] = &[
    TaskStatus::Completed,
    TaskStatus::Failed,
    TaskStatus::Cancelled,
    TaskStatus::Error,
];

pub fn is_terminal(status: &TaskStatus) -> bool {
    TERMINAL_STATUSES.contains(status)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
