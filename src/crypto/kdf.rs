//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Parameters are configurable via `Argon2Params`
//! (loaded from `.shelfvault.toml` or sensible defaults) and are written
//! into every `CipherBlob`, so a blob always decrypts with the cost it
//! was sealed with.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::errors::CipherError;

/// Length of the per-blob salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest memory cost a blob may ask for (1 GB).
pub const MAX_MEMORY_KIB: u32 = 1_048_576;

/// Largest iteration count a blob may ask for.
pub const MAX_ITERATIONS: u32 = 32;

/// Largest number of lanes a blob may ask for.
pub const MAX_PARALLELISM: u32 = 16;

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Check the parameters against the accepted bounds.
    ///
    /// Blobs carry their own parameters, so decryption must refuse values
    /// that would make key derivation absurdly expensive.
    pub fn validate(&self) -> Result<(), CipherError> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(CipherError::KeyDerivation(format!(
                "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(CipherError::KeyDerivation(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(CipherError::KeyDerivation(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Derive a 32-byte key from a secret and salt with explicit Argon2id
/// parameters.
///
/// The same secret + salt + params always produce the same key.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CipherError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(secret, salt, &mut *key)
        .map_err(|e| CipherError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"shelf123", &salt, &fast()).unwrap();
        let b = derive_key(b"shelf123", &salt, &fast()).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_salt_different_key() {
        let a = derive_key(b"shelf123", &[1u8; SALT_LEN], &fast()).unwrap();
        let b = derive_key(b"shelf123", &[2u8; SALT_LEN], &fast()).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn rejects_weak_memory_cost() {
        let params = Argon2Params {
            memory_kib: 1_024,
            ..fast()
        };
        assert!(derive_key(b"x", &[0u8; SALT_LEN], &params).is_err());
    }

    #[test]
    fn rejects_excessive_costs() {
        let huge_memory = Argon2Params {
            memory_kib: MAX_MEMORY_KIB + 1,
            ..fast()
        };
        let many_iterations = Argon2Params {
            iterations: MAX_ITERATIONS + 1,
            ..fast()
        };
        let no_lanes = Argon2Params {
            parallelism: 0,
            ..fast()
        };
        assert!(huge_memory.validate().is_err());
        assert!(many_iterations.validate().is_err());
        assert!(no_lanes.validate().is_err());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
