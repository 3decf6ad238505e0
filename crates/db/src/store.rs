//! Abstract document store the dashboard mutates against.
//!
//! The hosted backend is treated as an opaque collaborator: three write
//! operations, each of which may reject. Callers never interpret rejections
//! beyond "it failed"; enforcement authority lives in the store's own access
//! rules, not here.

use std::fmt;

use dashmap::DashMap;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("permission denied for {path}")]
    PermissionDenied { path: String },
    #[error("document not found: {path}")]
    NotFound { path: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Reference to a single document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: String,
    pub id: String,
}

impl DocPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Write surface of the external document store.
///
/// `update` merges the given fields into an existing document, `create`
/// inserts a new document with a generated id, `delete` removes one. All
/// three are single round-trips and may reject with an opaque error.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn update(&self, path: &DocPath, fields: Map<String, Value>) -> Result<(), StoreError>;
    async fn create(&self, collection: &str, fields: Map<String, Value>)
    -> Result<DocPath, StoreError>;
    async fn delete(&self, path: &DocPath) -> Result<(), StoreError>;
}

/// In-process document store used by tests and local runs.
///
/// Mimics the hosted store's behaviour closely enough for the workflow:
/// writes land in a flat `collection/id -> fields` map, and collections can
/// be marked write-denied to emulate server-side access rules rejecting a
/// mutation.
#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<String, Map<String, Value>>,
    denied_collections: DashMap<String, ()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulate the store's access rules denying all writes to a collection.
    pub fn deny_writes(&self, collection: &str) {
        self.denied_collections.insert(collection.to_string(), ());
    }

    pub fn get(&self, path: &DocPath) -> Option<Map<String, Value>> {
        self.docs.get(&path.to_string()).map(|d| d.clone())
    }

    pub fn insert(&self, path: &DocPath, fields: Map<String, Value>) {
        self.docs.insert(path.to_string(), fields);
    }

    pub fn contains(&self, path: &DocPath) -> bool {
        self.docs.contains_key(&path.to_string())
    }

    /// Snapshot of every document in a collection.
    pub fn docs_in(&self, collection: &str) -> Vec<(DocPath, Map<String, Value>)> {
        let prefix = format!("{collection}/");
        self.docs
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| {
                let id = entry.key()[prefix.len()..].to_string();
                (DocPath::new(collection, id), entry.value().clone())
            })
            .collect()
    }

    fn check_writable(&self, collection: &str, path: &str) -> Result<(), StoreError> {
        if self.denied_collections.contains_key(collection) {
            return Err(StoreError::PermissionDenied {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn update(&self, path: &DocPath, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.check_writable(&path.collection, &path.to_string())?;
        let key = path.to_string();
        let mut doc = self.docs.get_mut(&key).ok_or(StoreError::NotFound {
            path: key.clone(),
        })?;
        for (k, v) in fields {
            doc.insert(k, v);
        }
        tracing::debug!(path = %key, "memory store: document updated");
        Ok(())
    }

    async fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<DocPath, StoreError> {
        self.check_writable(collection, collection)?;
        let path = DocPath::new(collection, uuid::Uuid::new_v4().to_string());
        self.docs.insert(path.to_string(), fields);
        tracing::debug!(path = %path, "memory store: document created");
        Ok(path)
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        self.check_writable(&path.collection, &path.to_string())?;
        // Deleting an absent document is accepted; the operation is idempotent.
        self.docs.remove(&path.to_string());
        tracing::debug!(path = %path, "memory store: document deleted");
        Ok(())
    }
}
