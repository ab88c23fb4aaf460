use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::authorization::Credentials;

/// Current payload document version.
pub const PAYLOAD_VERSION: u32 = 2;

// ─── TaskPayload ─────────────────────────────────────────────────────────────

/// The body/authorization/storage/metadata bundle a task carries for its
/// executor. Pure value object: setters compose sub-documents, content
/// validation is the creator's job.
///
/// Setters ignore empty input rather than failing, so partially supplied
/// payloads keep their previously set (or default) sub-documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default)]
    pub body: HashMap<String, serde_json::Value>,
    /// Deprecated alias of `authorization`, retained for wire compatibility.
    #[serde(default)]
    pub authentication: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub authorization: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub storage: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
    #[serde(default = "payload_version")]
    pub version: u32,
}

fn payload_version() -> u32 {
    PAYLOAD_VERSION
}

impl Default for TaskPayload {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskPayload {
    pub fn new() -> Self {
        Self {
            body: HashMap::new(),
            authentication: HashMap::new(),
            authorization: HashMap::new(),
            storage: HashMap::new(),
            meta: HashMap::new(),
            version: PAYLOAD_VERSION,
        }
    }

    pub fn set_body(&mut self, body: HashMap<String, serde_json::Value>) -> &mut Self {
        if !body.is_empty() {
            self.body = body;
        }
        self
    }

    /// Sets the authentication sub-document.
    #[deprecated(note = "transition to set_authorization; kept for backward compatibility only")]
    pub fn set_authentication(
        &mut self,
        authentication: HashMap<String, serde_json::Value>,
    ) -> &mut Self {
        tracing::warn!(
            "set_authentication is deprecated, transition to set_authorization instead"
        );
        if !authentication.is_empty() {
            self.authentication = authentication.clone();
        }
        self.set_authorization(authentication)
    }

    pub fn set_authorization(
        &mut self,
        authorization: HashMap<String, serde_json::Value>,
    ) -> &mut Self {
        if !authorization.is_empty() {
            self.authorization = authorization;
        }
        self
    }

    /// Attaches canonical credentials produced by an authorization validator.
    pub fn set_credentials(&mut self, credentials: &Credentials) -> &mut Self {
        self.authorization = credentials.to_map();
        self
    }

    pub fn set_storage(&mut self, storage: HashMap<String, serde_json::Value>) -> &mut Self {
        if !storage.is_empty() {
            self.storage = storage;
        }
        self
    }

    pub fn set_meta(&mut self, meta: HashMap<String, serde_json::Value>) -> &mut Self {
        if !meta.is_empty() {
            self.meta = meta;
        }
        self
    }

    /// Post-deserialization fixup: an old document that only carried the
    /// deprecated `authentication` sub-document gets it mirrored into
    /// `authorization`.
    pub(crate) fn normalize(&mut self) {
        if self.authorization.is_empty() && !self.authentication.is_empty() {
            self.authorization = self.authentication.clone();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
