use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Result, TaskdefError};

// ─── Kinds ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbKind {
    Mongodb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Remote,
    S3,
    Gcs,
    Ftp,
}

// ─── DbRef ───────────────────────────────────────────────────────────────────

/// Locator for a database record a task refers to. Never owns the record;
/// the executor resolves it against the external database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbRef {
    pub id: String,
    pub identifier: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DbKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

impl DbRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identifier: "dbref".to_string(),
            kind: None,
            host: None,
            database: None,
            source: None,
            meta: None,
        }
    }

    pub fn mongodb(id: impl Into<String>, host: Option<String>) -> Self {
        let mut db_ref = Self::new(id);
        db_ref.kind = Some(DbKind::Mongodb);
        db_ref.host = host;
        db_ref
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn set_database(&mut self, database: impl Into<String>) -> &mut Self {
        self.database = Some(database.into());
        self
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = Some(source.into());
        self
    }

    pub fn set_meta(&mut self, meta: HashMap<String, serde_json::Value>) -> &mut Self {
        self.meta = Some(meta);
        self
    }
}

// ─── BulkDbRef ───────────────────────────────────────────────────────────────

/// Like [`DbRef`], but locating an ordered batch of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDbRef {
    pub ids: Vec<String>,
    pub identifier: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DbKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

impl BulkDbRef {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            identifier: "bulk_dbref".to_string(),
            kind: None,
            host: None,
            meta: None,
        }
    }

    pub fn mongodb(ids: Vec<String>, host: Option<String>) -> Self {
        let mut db_ref = Self::new(ids);
        db_ref.kind = Some(DbKind::Mongodb);
        db_ref.host = host;
        db_ref
    }

    pub fn set_ids(&mut self, ids: Vec<String>) -> &mut Self {
        self.ids = ids;
        self
    }

    pub fn add_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.ids.push(id.into());
        self
    }
}

// ─── StorageRef ──────────────────────────────────────────────────────────────

/// Locator for a blob in external storage. The constructors for hosted kinds
/// require their locating field up front; a ref without one never exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRef {
    pub object: serde_json::Value,
    pub identifier: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<StorageKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

impl StorageRef {
    pub fn new(object: serde_json::Value) -> Self {
        Self {
            object,
            identifier: "storageref".to_string(),
            kind: None,
            host: None,
            container: None,
            meta: None,
        }
    }

    pub fn local(object: serde_json::Value, container: impl Into<String>) -> Self {
        let mut storage_ref = Self::new(object);
        storage_ref.kind = Some(StorageKind::Local);
        storage_ref.container = Some(container.into());
        storage_ref
    }

    pub fn remote(object: serde_json::Value, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(TaskdefError::BadRequest(
                "Host is mandatory for Remote Storage Reference. Please provide the required \
                 host information."
                    .to_string(),
            ));
        }
        let mut storage_ref = Self::new(object);
        storage_ref.kind = Some(StorageKind::Remote);
        storage_ref.host = Some(host);
        Ok(storage_ref)
    }

    pub fn s3(object: serde_json::Value, container: impl Into<String>) -> Result<Self> {
        let container = container.into();
        if container.is_empty() {
            return Err(TaskdefError::BadRequest(
                "Bucket is mandatory for S3 Storage Reference. Please provide the required \
                 bucket/container information."
                    .to_string(),
            ));
        }
        let mut storage_ref = Self::new(object);
        storage_ref.kind = Some(StorageKind::S3);
        storage_ref.container = Some(container);
        Ok(storage_ref)
    }

    pub fn gcs(object: serde_json::Value, container: impl Into<String>) -> Result<Self> {
        let container = container.into();
        if container.is_empty() {
            return Err(TaskdefError::BadRequest(
                "Bucket is mandatory for GCS Storage Reference. Please provide the required \
                 bucket/container information."
                    .to_string(),
            ));
        }
        let mut storage_ref = Self::new(object);
        storage_ref.kind = Some(StorageKind::Gcs);
        storage_ref.container = Some(container);
        Ok(storage_ref)
    }

    pub fn ftp(object: serde_json::Value, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(TaskdefError::BadRequest(
                "Host is mandatory for FTP Storage Reference. Please provide the required host \
                 information."
                    .to_string(),
            ));
        }
        let mut storage_ref = Self::new(object);
        storage_ref.kind = Some(StorageKind::Ftp);
        storage_ref.host = Some(host);
        Ok(storage_ref)
    }

    pub fn set_object(&mut self, object: serde_json::Value) -> &mut Self {
        self.object = object;
        self
    }

    pub fn set_container(&mut self, container: impl Into<String>) -> &mut Self {
        self.container = Some(container.into());
        self
    }

    pub fn set_meta(&mut self, meta: HashMap<String, serde_json::Value>) -> &mut Self {
        self.meta = Some(meta);
        self
    }

    pub fn set_region(&mut self, region: impl Into<String>) -> &mut Self {
        self.meta_entry("region", serde_json::Value::String(region.into()))
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> &mut Self {
        self.meta_entry("username", serde_json::Value::String(username.into()))
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> &mut Self {
        self.meta_entry("password", serde_json::Value::String(password.into()))
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.meta_entry("port", json!(port))
    }

    fn meta_entry(&mut self, key: &str, value: serde_json::Value) -> &mut Self {
        self.meta
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value);
        self
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
