use thiserror::Error;

/// Failures of the cipher layer.
///
/// None of the variants carry key material or plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("Master secret must not be empty")]
    InvalidSecret,

    #[error("Decryption failed — wrong secret or corrupted data")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Errors raised by a remote document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store rejected the admin key")]
    Unauthorized,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid collection name '{0}'")]
    InvalidCollection(String),

    #[error("Store data is corrupted: {0}")]
    Corrupted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Establishing the remote session failed.
///
/// Cloneable so every caller waiting on the same attempt can receive it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not connect to the credential store: {reason}")]
pub struct ConnectionError {
    pub reason: String,
}

impl ConnectionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for ConnectionError {
    fn from(err: StoreError) -> Self {
        Self::new(err.to_string())
    }
}

/// Create/list against the remote store failed after a session existed.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Could not create document in '{collection}': {source}")]
    Create {
        collection: String,
        #[source]
        source: StoreError,
    },

    #[error("Could not list documents in '{collection}': {source}")]
    List {
        collection: String,
        #[source]
        source: StoreError,
    },

    #[error("Malformed document in '{collection}': {reason}")]
    MalformedDocument { collection: String, reason: String },
}

/// Access keys that do not pass form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyValidationError {
    #[error("Shelf key must be at least {min} characters")]
    ShelfKeyTooShort { min: usize },

    #[error("Admin key must be at least {min} characters")]
    AdminKeyTooShort { min: usize },
}

impl KeyValidationError {
    /// Localisation key describing this validation failure.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::ShelfKeyTooShort { .. } => "optionsPanel.shelfKeyTooShort",
            Self::AdminKeyTooShort { .. } => "settings.adminKeyTooShort",
        }
    }
}

/// All errors that can occur in ShelfVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Core pipeline errors ---
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("No session established; fetch passwords first")]
    SessionMissing,

    #[error(transparent)]
    InvalidKeys(#[from] KeyValidationError),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// A workflow failed and the user has already seen its notification.
    #[error("Workflow failed")]
    Notified,
}

/// Convenience type alias for ShelfVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
