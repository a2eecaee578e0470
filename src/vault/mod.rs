//! Vault module — credentials and where they live.
//!
//! This module provides:
//! - Credential and key types (`credential`)
//! - Typed create/list over the remote store (`repository`)
//! - The fetched password list and option panel state (`list_state`)

pub mod credential;
pub mod list_state;
pub mod repository;

// Re-export the most commonly used items.
pub use credential::{
    AccessKeyPair, AdminKey, CredentialEntity, CredentialPayload, EncryptedCredentialRecord,
    MasterSecret,
};
pub use list_state::{OptionPanelVariant, PasswordListState, PasswordListStore};
pub use repository::CredentialRepository;
