//! AES-256-GCM credential encryption.
//!
//! `CipherService` seals a `CredentialPayload` under a `MasterSecret` and
//! opens it again.  Every call draws a fresh salt and nonce, so sealing
//! the same payload twice yields two unrelated blobs.
//!
//! Key schedule per blob:
//!   Argon2id(secret, salt, params) -> HKDF-SHA256 expand -> AES-256-GCM key
//!
//! The service keeps no state besides the Argon2 cost it seals with and
//! performs no I/O.  Plaintext and key material only live on the stack of
//! a single call and are zeroized before it returns.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use super::blob::{BlobHeader, CipherBlob, NONCE_LEN};
use super::kdf::{derive_key, generate_salt, Argon2Params};
use super::keys::derive_record_key;
use crate::errors::CipherError;
use crate::vault::{CredentialEntity, CredentialPayload, EncryptedCredentialRecord, MasterSecret};

/// Stateless credential cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct CipherService {
    params: Argon2Params,
}

impl CipherService {
    /// Build a cipher that seals new blobs with the given Argon2 cost.
    ///
    /// Decryption always uses the cost recorded in the blob itself.
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> Argon2Params {
        self.params
    }

    /// Encrypt `payload` under `secret`.
    ///
    /// Passing `Some(label)` binds the record label into the blob as
    /// associated data; `decrypt_record` then refuses the blob under any
    /// other label.
    pub fn encrypt(
        &self,
        payload: &CredentialPayload,
        secret: &MasterSecret,
        label_aad: Option<&str>,
    ) -> Result<CipherBlob, CipherError> {
        if secret.is_empty() {
            return Err(CipherError::InvalidSecret);
        }

        // Generate a random 12-byte nonce and a fresh salt.
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(&nonce);

        let header = BlobHeader {
            params: self.params,
            salt: generate_salt(),
            nonce: nonce_bytes,
            label: label_aad.map(str::to_string),
        };
        let header_bytes = header.encode()?;

        let cipher = record_cipher(secret, &header)?;

        let plaintext = Zeroizing::new(
            serde_json::to_vec(payload)
                .map_err(|e| CipherError::Encoding(format!("credential payload: {e}")))?,
        );

        // Encrypt and authenticate the payload together with the header.
        let ciphertext = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: &header_bytes,
                },
            )
            .map_err(|e| CipherError::Encoding(format!("encryption error: {e}")))?;

        let mut output = header_bytes;
        output.extend_from_slice(&ciphertext);
        Ok(CipherBlob::from_bytes(&output))
    }

    /// Decrypt a blob produced by `encrypt`.
    ///
    /// Any integrity failure (wrong secret, truncation, a flipped bit
    /// anywhere in the blob) is `AuthenticationFailed`; no partial
    /// plaintext is ever returned.
    pub fn decrypt(
        &self,
        blob: &CipherBlob,
        secret: &MasterSecret,
    ) -> Result<CredentialPayload, CipherError> {
        self.open(blob, secret).map(|(payload, _)| payload)
    }

    /// Decrypt a stored record for display.
    ///
    /// If the blob was sealed with a bound label, it must match the
    /// record's label.
    pub fn decrypt_record(
        &self,
        record: &EncryptedCredentialRecord,
        secret: &MasterSecret,
    ) -> Result<CredentialEntity, CipherError> {
        let (payload, bound_label) = self.open(&record.value, secret)?;

        if bound_label.is_some_and(|label| label != record.label) {
            return Err(CipherError::AuthenticationFailed);
        }

        Ok(CredentialEntity::new(
            record.label.clone(),
            payload.login.clone(),
            payload.password.clone(),
        ))
    }

    fn open(
        &self,
        blob: &CipherBlob,
        secret: &MasterSecret,
    ) -> Result<(CredentialPayload, Option<String>), CipherError> {
        if secret.is_empty() {
            return Err(CipherError::InvalidSecret);
        }

        let data = blob.to_bytes()?;
        let (header, header_len) = BlobHeader::parse(&data)?;
        let (aad, ciphertext) = data.split_at(header_len);

        let cipher =
            record_cipher(secret, &header).map_err(|_| CipherError::AuthenticationFailed)?;

        // Decrypt and verify the auth tag.
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::from_slice(&header.nonce),
                    Payload {
                        msg: ciphertext,
                        aad,
                    },
                )
                .map_err(|_| CipherError::AuthenticationFailed)?,
        );

        let payload: CredentialPayload =
            serde_json::from_slice(&plaintext).map_err(|_| CipherError::AuthenticationFailed)?;

        Ok((payload, header.label))
    }
}

/// Build the AES-256-GCM instance for one blob.
fn record_cipher(secret: &MasterSecret, header: &BlobHeader) -> Result<Aes256Gcm, CipherError> {
    let ikm = derive_key(secret.expose().as_bytes(), &header.salt, &header.params)?;
    let key = derive_record_key(&*ikm)?;

    Aes256Gcm::new_from_slice(&*key)
        .map_err(|e| CipherError::KeyDerivation(format!("invalid key length: {e}")))
}
