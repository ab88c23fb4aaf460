use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ─── TaskMessage ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Warning,
    Error,
}

/// Human-readable note a worker attaches to a task run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMessage {
    pub message: String,
    pub identifier: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

impl TaskMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            identifier: "message".to_string(),
            kind: None,
            meta: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        let mut msg = Self::new(message);
        msg.kind = Some(MessageKind::Warning);
        msg
    }

    pub fn error(message: impl Into<String>) -> Self {
        let mut msg = Self::new(message);
        msg.kind = Some(MessageKind::Error);
        msg
    }

    pub fn set_meta(&mut self, meta: HashMap<String, serde_json::Value>) -> &mut Self {
        self.meta = Some(meta);
        self
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
