//! Remote document store interface.
//!
//! The credential store is reached through two async traits: a
//! `RemoteConnector` that turns an admin key into a live client, and the
//! `DocumentClient` it returns, which knows nothing but collections of
//! JSON documents.  Nothing in this layer understands credentials or
//! encryption.
//!
//! Two backends ship with the crate:
//! - `MemoryStore`, an in-process store (`memory`)
//! - `FileStore`, a directory of JSON collection files (`file`)

pub mod file;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::vault::AdminKey;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Identifier assigned by the store to a created document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opens sessions against a document store.
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    /// Authenticate with `admin_key` and return a client for the store.
    async fn connect(&self, admin_key: &AdminKey) -> Result<Arc<dyn DocumentClient>, StoreError>;
}

/// Generic document API of an established store client.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Append `document` to `collection` and return its new id.
    async fn create(
        &self,
        collection: &str,
        document: serde_json::Value,
    ) -> Result<DocumentId, StoreError>;

    /// Return every document in `collection`, oldest first.
    ///
    /// An unknown collection is empty, not an error.
    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError>;
}
