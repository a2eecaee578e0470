//! In-process document store.
//!
//! Holds every collection in memory behind a lock.  Cloning a
//! `MemoryStore` shares the same collections, which lets a test keep a
//! handle for inspection while the vault owns another.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use zeroize::Zeroizing;

use super::{DocumentClient, DocumentId, RemoteConnector};
use crate::errors::StoreError;
use crate::vault::AdminKey;

#[derive(Default)]
struct Shared {
    /// When set, only this admin key may connect.
    admin_key: Option<Zeroizing<String>>,
    collections: RwLock<HashMap<String, Vec<(DocumentId, serde_json::Value)>>>,
    next_id: AtomicU64,
}

/// A document store that lives in process memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// A store that accepts any admin key.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every admin key but `admin_key`.
    pub fn with_admin_key(admin_key: &str) -> Self {
        Self {
            shared: Arc::new(Shared {
                admin_key: Some(Zeroizing::new(admin_key.to_string())),
                ..Shared::default()
            }),
        }
    }

    /// Number of documents currently held in `collection`.
    pub fn document_count(&self, collection: &str) -> usize {
        self.shared
            .collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl RemoteConnector for MemoryStore {
    async fn connect(&self, admin_key: &AdminKey) -> Result<Arc<dyn DocumentClient>, StoreError> {
        if let Some(expected) = &self.shared.admin_key {
            if expected.as_str() != admin_key.expose() {
                return Err(StoreError::Unauthorized);
            }
        }
        Ok(Arc::new(MemoryClient {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct MemoryClient {
    shared: Arc<Shared>,
}

#[async_trait]
impl DocumentClient for MemoryClient {
    async fn create(
        &self,
        collection: &str,
        document: serde_json::Value,
    ) -> Result<DocumentId, StoreError> {
        let n = self.shared.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id = DocumentId::new(format!("mem-{n}"));
        self.shared
            .collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), document));
        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError> {
        Ok(self
            .shared
            .collections
            .read()
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }
}
