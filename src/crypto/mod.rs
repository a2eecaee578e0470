//! Cryptographic primitives for ShelfVault.
//!
//! This module provides:
//! - The `CipherService` sealing credentials with AES-256-GCM (`cipher`)
//! - The self-describing `CipherBlob` wire format (`blob`)
//! - Argon2id password-based key derivation (`kdf`)
//! - HKDF-based record key derivation (`keys`)

pub mod blob;
pub mod cipher;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CipherService, CipherBlob, Argon2Params};
pub use blob::CipherBlob;
pub use cipher::CipherService;
pub use kdf::Argon2Params;
