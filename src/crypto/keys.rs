//! Cipher key derivation using HKDF-SHA256.
//!
//! The Argon2id output is treated as input keying material and expanded
//! with a fixed context string, so the key that reaches AES-GCM is bound
//! to this use and never equals the raw KDF output.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::kdf::KEY_LEN;
use crate::errors::CipherError;

/// HKDF `info` for credential record encryption keys.
const CREDENTIAL_KEY_INFO: &[u8] = b"shelfvault-credential-key-v1";

/// Derive the AES-256-GCM key for a credential record.
pub fn derive_record_key(ikm: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    hkdf_derive(ikm, CREDENTIAL_KEY_INFO)
}

// No HKDF salt: the IKM already came out of a salted Argon2id run.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(info, &mut *okm)
        .map_err(|e| CipherError::KeyDerivation(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}
