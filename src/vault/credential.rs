//! Credential types and the key material that protects them.
//!
//! Plaintext lives in `CredentialEntity` / `CredentialPayload`, both of
//! which are wiped on drop.  The only shape that ever leaves the process
//! is `EncryptedCredentialRecord`, whose `value` is an opaque `CipherBlob`.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::CipherBlob;
use crate::errors::KeyValidationError;

/// Minimum shelf key length accepted by the connect form.
pub const MIN_SHELF_KEY_LEN: usize = 6;

/// Minimum admin key length accepted by the connect form.
pub const MIN_ADMIN_KEY_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// User-held secret from which credential encryption keys are derived.
///
/// Never persisted and never printed: `Debug` is redacted.
#[derive(Clone)]
pub struct MasterSecret(Zeroizing<String>);

impl MasterSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}

/// Key that authenticates a session against the remote store.
#[derive(Clone)]
pub struct AdminKey(Zeroizing<String>);

impl AdminKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(<redacted>)")
    }
}

/// The two keys a user supplies to open their shelf.
///
/// The shelf key doubles as the master secret for every record on the
/// shelf; the admin key is only ever handed to `RemoteConnector::connect`.
#[derive(Clone)]
pub struct AccessKeyPair {
    shelf_key: MasterSecret,
    admin_key: AdminKey,
}

impl AccessKeyPair {
    pub fn new(shelf_key: impl Into<String>, admin_key: impl Into<String>) -> Self {
        Self {
            shelf_key: MasterSecret::new(shelf_key),
            admin_key: AdminKey::new(admin_key),
        }
    }

    /// The secret used to encrypt and decrypt records on this shelf.
    pub fn master_secret(&self) -> &MasterSecret {
        &self.shelf_key
    }

    pub fn admin_key(&self) -> &AdminKey {
        &self.admin_key
    }

    /// Check both keys against the connect form's length rules.
    ///
    /// Lengths are counted in characters, not bytes.
    pub fn validate(&self) -> Result<(), KeyValidationError> {
        if self.admin_key.expose().chars().count() < MIN_ADMIN_KEY_LEN {
            return Err(KeyValidationError::AdminKeyTooShort {
                min: MIN_ADMIN_KEY_LEN,
            });
        }
        if self.shelf_key.expose().chars().count() < MIN_SHELF_KEY_LEN {
            return Err(KeyValidationError::ShelfKeyTooShort {
                min: MIN_SHELF_KEY_LEN,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for AccessKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyPair")
            .field("shelf_key", &self.shelf_key)
            .field("admin_key", &self.admin_key)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Plaintext credentials
// ---------------------------------------------------------------------------

/// A plaintext credential as the user sees it.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialEntity {
    pub label: String,
    pub login: String,
    pub password: String,
}

impl CredentialEntity {
    pub fn new(
        label: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            login: login.into(),
            password: password.into(),
        }
    }

    /// The part of the entity that gets encrypted.
    pub fn payload(&self) -> CredentialPayload {
        CredentialPayload {
            login: self.login.clone(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for CredentialEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntity")
            .field("label", &self.label)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The `{login, password}` pair sealed inside a `CipherBlob`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialPayload {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for CredentialPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPayload")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Stored shape
// ---------------------------------------------------------------------------

/// The only credential shape sent to or read from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedCredentialRecord {
    pub label: String,
    pub value: CipherBlob,
}
