//! Self-describing `CipherBlob` wire format.
//!
//! A blob is the base64 encoding of:
//!
//! ```text
//! [version: 1][flags: 1][m_cost: 4 LE][t_cost: 4 LE][p_cost: 4 LE]
//! [salt: 16][nonce: 12][label_len: 2 LE + label, iff flags & LABEL]
//! [ciphertext + 16-byte GCM tag]
//! ```
//!
//! Everything before the ciphertext is the header.  The header is fed to
//! AES-GCM as associated data, so changing any byte of it breaks the tag.
//! Parse failures of any kind are reported as `AuthenticationFailed`:
//! callers cannot tell a malformed blob from a tampered one.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::kdf::{Argon2Params, SALT_LEN};
use crate::errors::CipherError;

/// Current blob format version.
pub const BLOB_VERSION: u8 = 1;

/// Set when the record label is bound into the header.
const FLAG_LABEL: u8 = 0x01;

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// version + flags + three u32 costs + salt + nonce.
const FIXED_HEADER_LEN: usize = 1 + 1 + 4 * 3 + SALT_LEN + NONCE_LEN;

/// Opaque, transport-safe authenticated ciphertext.
///
/// Serializes as a plain base64 string so it fits a string-typed
/// `value` field in the remote store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherBlob(String);

impl CipherBlob {
    /// Wrap raw blob bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(BASE64.encode(bytes))
    }

    /// Wrap an already encoded blob (as read back from a store).
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the transport encoding back into raw blob bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CipherError> {
        BASE64
            .decode(&self.0)
            .map_err(|_| CipherError::AuthenticationFailed)
    }
}

impl fmt::Debug for CipherBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherBlob({} chars)", self.0.len())
    }
}

/// Everything needed to re-derive the key and open the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHeader {
    pub params: Argon2Params,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Record label bound as associated data, if any.
    pub label: Option<String>,
}

impl BlobHeader {
    /// Serialize the header into its on-wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CipherError> {
        let label_bytes = self.label.as_deref().map(str::as_bytes);
        let label_len = match label_bytes {
            Some(bytes) => Some(u16::try_from(bytes.len()).map_err(|_| {
                CipherError::Encoding(format!(
                    "label of {} bytes exceeds {} bytes",
                    bytes.len(),
                    u16::MAX
                ))
            })?),
            None => None,
        };

        let mut buf =
            Vec::with_capacity(FIXED_HEADER_LEN + label_bytes.map_or(0, |b| 2 + b.len()));
        buf.push(BLOB_VERSION);
        buf.push(if label_len.is_some() { FLAG_LABEL } else { 0 });
        buf.extend_from_slice(&self.params.memory_kib.to_le_bytes());
        buf.extend_from_slice(&self.params.iterations.to_le_bytes());
        buf.extend_from_slice(&self.params.parallelism.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        if let (Some(len), Some(bytes)) = (label_len, label_bytes) {
            buf.extend_from_slice(&len.to_le_bytes());
            buf.extend_from_slice(bytes);
        }
        Ok(buf)
    }

    /// Parse a header off the front of `data`.
    ///
    /// Returns the header and its length in bytes; the rest of `data` is
    /// the ciphertext, which is guaranteed to be at least a tag long.
    pub fn parse(data: &[u8]) -> Result<(Self, usize), CipherError> {
        let mut reader = Reader { data, pos: 0 };

        if reader.u8()? != BLOB_VERSION {
            return Err(CipherError::AuthenticationFailed);
        }
        let flags = reader.u8()?;
        if flags & !FLAG_LABEL != 0 {
            return Err(CipherError::AuthenticationFailed);
        }

        let params = Argon2Params {
            memory_kib: reader.u32()?,
            iterations: reader.u32()?,
            parallelism: reader.u32()?,
        };
        // Refuse hostile costs before anyone runs the KDF on them.
        params
            .validate()
            .map_err(|_| CipherError::AuthenticationFailed)?;

        let salt = reader.array::<SALT_LEN>()?;
        let nonce = reader.array::<NONCE_LEN>()?;

        let label = if flags & FLAG_LABEL != 0 {
            let len = usize::from(u16::from_le_bytes(reader.array::<2>()?));
            let bytes = reader.take(len)?;
            Some(
                String::from_utf8(bytes.to_vec())
                    .map_err(|_| CipherError::AuthenticationFailed)?,
            )
        } else {
            None
        };

        if data.len() - reader.pos < TAG_LEN {
            return Err(CipherError::AuthenticationFailed);
        }

        Ok((
            Self {
                params,
                salt,
                nonce,
                label,
            },
            reader.pos,
        ))
    }
}

/// Bounds-checked cursor over blob bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], CipherError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(CipherError::AuthenticationFailed)?;
        let data = self.data;
        let slice = &data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CipherError> {
        self.take(N)?
            .try_into()
            .map_err(|_| CipherError::AuthenticationFailed)
    }

    fn u8(&mut self) -> Result<u8, CipherError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, CipherError> {
        Ok(u32::from_le_bytes(self.array::<4>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(label: Option<&str>) -> BlobHeader {
        BlobHeader {
            params: Argon2Params {
                memory_kib: 8_192,
                iterations: 1,
                parallelism: 1,
            },
            salt: [3u8; SALT_LEN],
            nonce: [9u8; NONCE_LEN],
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn header_without_label_has_fixed_length() {
        let bytes = header(None).encode().unwrap();
        assert_eq!(bytes.len(), FIXED_HEADER_LEN);
        assert_eq!(bytes[0], BLOB_VERSION);
        assert_eq!(bytes[1], 0);
    }

    #[test]
    fn parse_reads_back_label_and_params() {
        let original = header(Some("email"));
        let mut bytes = original.encode().unwrap();
        let header_len = bytes.len();
        bytes.extend_from_slice(&[0u8; TAG_LEN]);

        let (parsed, len) = BlobHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(len, header_len);
    }

    #[test]
    fn parse_rejects_missing_tag() {
        let bytes = header(None).encode().unwrap();
        assert_eq!(
            BlobHeader::parse(&bytes),
            Err(CipherError::AuthenticationFailed)
        );
    }

    #[test]
    fn parse_rejects_unknown_version_and_flags() {
        let mut bytes = header(None).encode().unwrap();
        bytes.extend_from_slice(&[0u8; TAG_LEN]);

        let mut bad_version = bytes.clone();
        bad_version[0] = 2;
        assert!(BlobHeader::parse(&bad_version).is_err());

        let mut bad_flags = bytes;
        bad_flags[1] = 0x80;
        assert!(BlobHeader::parse(&bad_flags).is_err());
    }

    #[test]
    fn parse_rejects_label_longer_than_data() {
        let mut bytes = header(Some("email")).encode().unwrap();
        bytes[FIXED_HEADER_LEN] = 0xFF;
        bytes[FIXED_HEADER_LEN + 1] = 0xFF;
        bytes.extend_from_slice(&[0u8; TAG_LEN]);
        assert!(BlobHeader::parse(&bytes).is_err());
    }

    #[test]
    fn parse_rejects_hostile_costs() {
        let mut h = header(None);
        h.params.iterations = 1_000;
        let mut bytes = h.encode().unwrap();
        bytes.extend_from_slice(&[0u8; TAG_LEN]);
        assert!(BlobHeader::parse(&bytes).is_err());
    }

    #[test]
    fn invalid_base64_is_an_authentication_failure() {
        let blob = CipherBlob::from_encoded("not base64!!");
        assert_eq!(blob.to_bytes(), Err(CipherError::AuthenticationFailed));
    }

    #[test]
    fn debug_does_not_print_contents() {
        let blob = CipherBlob::from_bytes(b"abc");
        assert_eq!(format!("{blob:?}"), "CipherBlob(4 chars)");
    }
}
