//! Typed credential operations over the generic document API.
//!
//! The repository only moves `EncryptedCredentialRecord`s.  It never
//! sees a secret and never decrypts anything; that stays with the caller.

use crate::errors::RepositoryError;
use crate::remote::DocumentId;
use crate::session::Session;

use super::credential::EncryptedCredentialRecord;

/// Default collection holding credential records.
pub const DEFAULT_COLLECTION: &str = "passwords";

/// Credential records in one collection of the remote store.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    collection: String,
}

impl Default for CredentialRepository {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION)
    }
}

impl CredentialRepository {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Every record in the collection, in store order.
    pub async fn list_all(
        &self,
        session: &Session,
    ) -> Result<Vec<EncryptedCredentialRecord>, RepositoryError> {
        let documents = session
            .client()
            .list(&self.collection)
            .await
            .map_err(|source| RepositoryError::List {
                collection: self.collection.clone(),
                source,
            })?;

        let records = documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value::<EncryptedCredentialRecord>(doc).map_err(|e| {
                    RepositoryError::MalformedDocument {
                        collection: self.collection.clone(),
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(collection = %self.collection, count = records.len(), "listed credentials");
        Ok(records)
    }

    /// Append one record.  Records with the same label coexist.
    pub async fn create_one(
        &self,
        session: &Session,
        record: &EncryptedCredentialRecord,
    ) -> Result<DocumentId, RepositoryError> {
        let document = serde_json::to_value(record).map_err(|e| RepositoryError::Create {
            collection: self.collection.clone(),
            source: e.into(),
        })?;

        let id = session
            .client()
            .create(&self.collection, document)
            .await
            .map_err(|source| RepositoryError::Create {
                collection: self.collection.clone(),
                source,
            })?;

        tracing::debug!(collection = %self.collection, id = %id, "created credential");
        Ok(id)
    }
}
