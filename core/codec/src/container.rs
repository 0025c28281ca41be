//! Container envelope format.
//!
//! Layout: `"KBVC"` magic, a little-endian u32 header length, a JSON header
//! with the key-derivation inputs, then the sealed hierarchy payload. The
//! header is authenticated only indirectly: tampering with salt or KDF
//! parameters changes the derived key and the payload fails to open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cipher::{self, KdfParams, SALT_LENGTH};
use keybridge_common::{Error, Result};
use keybridge_vault::Hierarchy;

/// Magic bytes identifying a KeyBridge vault container.
pub const MAGIC: &[u8; 4] = b"KBVC";

/// Container format version, gated on the major number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ContainerVersion {
    /// Current container format version.
    pub const CURRENT: Self = Self { major: 1, minor: 0 };

    /// Whether a container with this version can be opened.
    pub fn is_compatible(&self) -> bool {
        self.major == Self::CURRENT.major
    }
}

impl Default for ContainerVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Cleartext container header carrying the inputs needed to re-derive
/// the sealing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerHeader {
    /// Container format version.
    pub version: ContainerVersion,
    /// Salt for key derivation.
    pub salt: [u8; SALT_LENGTH],
    /// KDF parameters the container was sealed with.
    pub kdf: KdfParams,
    /// Seal timestamp.
    pub created_at: DateTime<Utc>,
}

/// Seal a hierarchy into container bytes.
///
/// # Errors
/// - `Format` on serialization failure or invalid KDF parameters
pub fn seal(hierarchy: &Hierarchy, password: &str, kdf: KdfParams) -> Result<Vec<u8>> {
    let header = ContainerHeader {
        version: ContainerVersion::CURRENT,
        salt: cipher::generate_salt(),
        kdf,
        created_at: Utc::now(),
    };

    let header_bytes =
        serde_json::to_vec(&header).map_err(|e| Error::Format(e.to_string()))?;
    let plaintext =
        serde_json::to_vec(hierarchy).map_err(|e| Error::Format(e.to_string()))?;
    let payload = cipher::seal_payload(password, &header.salt, &header.kdf, &plaintext)?;

    let mut container =
        Vec::with_capacity(MAGIC.len() + 4 + header_bytes.len() + payload.len());
    container.extend_from_slice(MAGIC);
    container.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    container.extend_from_slice(&header_bytes);
    container.extend_from_slice(&payload);

    Ok(container)
}

/// Parse the cleartext header of a container, without opening the payload.
///
/// Returns the header and the offset at which the sealed payload starts.
pub fn read_header(bytes: &[u8]) -> Result<(ContainerHeader, usize)> {
    let after_magic = bytes
        .strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| Error::Format("not a vault container".to_string()))?;

    let len_bytes: [u8; 4] = after_magic
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| Error::Format("unexpected end of header".to_string()))?;
    let header_len = u32::from_le_bytes(len_bytes) as usize;

    let header_bytes = after_magic
        .get(4..4 + header_len)
        .ok_or_else(|| Error::Format("unexpected end of header".to_string()))?;
    let header: ContainerHeader =
        serde_json::from_slice(header_bytes).map_err(|e| Error::Format(e.to_string()))?;

    if !header.version.is_compatible() {
        return Err(Error::Format(format!(
            "unsupported container version {}.{}",
            header.version.major, header.version.minor
        )));
    }

    Ok((header, MAGIC.len() + 4 + header_len))
}

/// Open container bytes into a hierarchy.
///
/// # Errors
/// - `Format` for a malformed or incompatible container
/// - `Auth` if the password is rejected
pub fn open(bytes: &[u8], password: &str) -> Result<Hierarchy> {
    let (header, payload_start) = read_header(bytes)?;

    let plaintext =
        cipher::open_payload(password, &header.salt, &header.kdf, &bytes[payload_start..])?;

    serde_json::from_slice(&plaintext).map_err(|e| Error::Format(e.to_string()))
}
