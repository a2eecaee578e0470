//! Directory-backed document store.
//!
//! Each admin key maps to its own namespace directory, named by a
//! SHA-256 fingerprint of the key so the key itself never touches disk:
//!
//! ```text
//! <root>/<fingerprint>/<collection>.json
//! ```
//!
//! A collection file is a JSON object `{ "version": 1, "documents": [...] }`
//! where each entry is `{ "id": "...", "document": { ... } }`.  Writes go
//! through a temp file + rename so readers never see a half-written file.
//! Writers within one process are serialized; concurrent writers from
//! several processes are not coordinated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use super::{DocumentClient, DocumentId, RemoteConnector};
use crate::errors::StoreError;
use crate::vault::AdminKey;

/// Current collection file format version.
const COLLECTION_VERSION: u8 = 1;

/// Length of the namespace fingerprint in hex characters.
const FINGERPRINT_LEN: usize = 32;

/// Length of generated document ids in bytes.
const DOCUMENT_ID_LEN: usize = 12;

#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    version: u8,
    documents: Vec<StoredDocument>,
}

impl Default for CollectionFile {
    fn default() -> Self {
        Self {
            version: COLLECTION_VERSION,
            documents: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    id: DocumentId,
    document: serde_json::Value,
}

/// A document store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the collections reachable with `admin_key`.
    pub fn namespace_dir(&self, admin_key: &AdminKey) -> PathBuf {
        self.root.join(fingerprint(admin_key))
    }
}

#[async_trait]
impl RemoteConnector for FileStore {
    async fn connect(&self, admin_key: &AdminKey) -> Result<Arc<dyn DocumentClient>, StoreError> {
        let dir = self.namespace_dir(admin_key);
        tokio::fs::create_dir_all(&dir).await?;

        tracing::debug!(namespace = %dir.display(), "opened file store namespace");

        Ok(Arc::new(FileClient {
            dir,
            write_lock: Mutex::new(()),
        }))
    }
}

struct FileClient {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileClient {
    fn collection_path(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_collection_name(collection)?;
        Ok(self.dir.join(format!("{collection}.json")))
    }

    async fn read_collection(path: &Path) -> Result<CollectionFile, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CollectionFile::default())
            }
            Err(e) => return Err(e.into()),
        };

        let file: CollectionFile = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupted(format!("{}: {e}", path.display())))?;

        if file.version != COLLECTION_VERSION {
            return Err(StoreError::Corrupted(format!(
                "{}: unsupported version {}, expected {COLLECTION_VERSION}",
                path.display(),
                file.version
            )));
        }

        Ok(file)
    }

    // Atomic write: temp file in the same directory, then rename.
    async fn write_collection(path: &Path, file: &CollectionFile) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(file)?;

        let parent = path.parent().unwrap_or(Path::new("."));
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));

        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentClient for FileClient {
    async fn create(
        &self,
        collection: &str,
        document: serde_json::Value,
    ) -> Result<DocumentId, StoreError> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let mut file = Self::read_collection(&path).await?;
        let id = generate_document_id();
        file.documents.push(StoredDocument {
            id: id.clone(),
            document,
        });
        Self::write_collection(&path, &file).await?;

        tracing::debug!(collection, id = %id, "document written");
        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError> {
        let path = self.collection_path(collection)?;
        let file = Self::read_collection(&path).await?;
        Ok(file.documents.into_iter().map(|d| d.document).collect())
    }
}

/// Hex SHA-256 fingerprint of an admin key, truncated.
fn fingerprint(admin_key: &AdminKey) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"shelfvault-namespace:");
    hasher.update(admin_key.expose().as_bytes());
    hex::encode(&hasher.finalize()[..FINGERPRINT_LEN / 2])
}

fn generate_document_id() -> DocumentId {
    let mut bytes = [0u8; DOCUMENT_ID_LEN];
    rand::rng().fill_bytes(&mut bytes);
    DocumentId::new(hex::encode(bytes))
}

/// Collection names become file names, so keep them boring.
///
/// Allowed: ASCII letters, digits, underscores, hyphens.
/// Must be non-empty and at most 64 characters.
fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn documents_survive_a_new_connection() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        let key = AdminKey::new("admin1234567890");

        let client = store.connect(&key).await.unwrap();
        client.create("passwords", json!({ "label": "email" })).await.unwrap();
        drop(client);

        let again = store.connect(&key).await.unwrap();
        let docs = again.list("passwords").await.unwrap();
        assert_eq!(docs, vec![json!({ "label": "email" })]);
    }

    #[tokio::test]
    async fn admin_keys_get_separate_namespaces() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        let alice = store.connect(&AdminKey::new("alice-admin-key")).await.unwrap();
        let bob = store.connect(&AdminKey::new("bob-admin-key-1")).await.unwrap();
        alice.create("passwords", json!({ "n": 1 })).await.unwrap();

        assert!(bob.list("passwords").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn namespace_dir_does_not_contain_the_key() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        let key = AdminKey::new("admin1234567890");

        let dir = store.namespace_dir(&key);
        assert_eq!(dir.parent(), Some(store.root()));
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name.len(), FINGERPRINT_LEN);
        assert!(!name.contains("admin1234567890"));
    }

    #[test]
    fn fingerprint_is_a_truncated_lowercase_digest() {
        let key = AdminKey::new("admin1234567890");
        let name = fingerprint(&key);

        assert_eq!(name, fingerprint(&key));
        assert!(name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));

        let full = hex::encode(Sha256::digest(b"shelfvault-namespace:admin1234567890"));
        assert_eq!(name, full[..FINGERPRINT_LEN]);
    }

    #[test]
    fn document_ids_are_random_hex() {
        let a = generate_document_id();
        let b = generate_document_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), DOCUMENT_ID_LEN * 2);
        assert!(hex::decode(a.as_str()).is_ok());
    }

    #[tokio::test]
    async fn rejects_path_like_collection_names() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        let client = store.connect(&AdminKey::new("admin1234567890")).await.unwrap();

        assert!(matches!(
            client.list("../escape").await,
            Err(StoreError::InvalidCollection(_))
        ));
    }

    #[tokio::test]
    async fn corrupted_collection_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        let key = AdminKey::new("admin1234567890");
        let client = store.connect(&key).await.unwrap();

        std::fs::write(store.namespace_dir(&key).join("passwords.json"), "{not json").unwrap();

        assert!(matches!(
            client.list("passwords").await,
            Err(StoreError::Corrupted(_))
        ));
    }
}
