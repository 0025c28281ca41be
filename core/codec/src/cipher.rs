//! Password-based sealing primitives.
//!
//! Keys are derived with Argon2id and payloads sealed with
//! XChaCha20-Poly1305. The derived key never leaves this module and is
//! zeroized as soon as the cipher has been constructed.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use keybridge_common::{Error, Result};

/// Length of the derived key in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of the random salt in bytes.
pub const SALT_LENGTH: usize = 32;

/// Nonce size for XChaCha20-Poly1305 (24 bytes), prepended to the payload.
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes), appended to the payload.
pub const TAG_SIZE: usize = 16;

/// Parameters for Argon2id key derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl KdfParams {
    /// Parameters suitable for interactive use, targeting well under a
    /// second of derivation time.
    pub fn interactive() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// Moderate parameters for constrained hosts.
    pub fn moderate() -> Self {
        Self {
            memory_cost: 32768, // 32 MiB
            time_cost: 3,
            parallelism: 2,
        }
    }

    /// High-security parameters; derivation may take several seconds.
    pub fn sensitive() -> Self {
        Self {
            memory_cost: 262144, // 256 MiB
            time_cost: 4,
            parallelism: 4,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Derive the sealing key for (password, salt, params).
///
/// Deterministic given the same inputs. An empty password is legal input;
/// it simply derives a key that fails to open anything sealed otherwise.
fn derive_key(password: &str, salt: &[u8; SALT_LENGTH], params: &KdfParams) -> Result<[u8; KEY_LENGTH]> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| Error::Format(format!("invalid KDF parameters: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Format(format!("key derivation failed: {}", e)))?;

    Ok(key)
}

/// Seal a plaintext payload under the given password.
///
/// Returns nonce || ciphertext || tag with a freshly random nonce.
pub fn seal_payload(
    password: &str,
    salt: &[u8; SALT_LENGTH],
    params: &KdfParams,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let mut key = derive_key(password, salt, params)?;
    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(&key));
    key.zeroize();

    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Format(format!("sealing failed: {}", e)))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);

    Ok(sealed)
}

/// Open a sealed payload (nonce || ciphertext || tag).
///
/// # Errors
/// - `Format` if the payload is too short to contain nonce and tag
/// - `Auth` if authentication fails; a wrong password and a tampered
///   payload are indistinguishable here
pub fn open_payload(
    password: &str,
    salt: &[u8; SALT_LENGTH],
    params: &KdfParams,
    sealed: &[u8],
) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::Format("sealed payload too short".to_string()));
    }

    let mut key = derive_key(password, salt, params)?;
    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(&key));
    key.zeroize();

    let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
    cipher
        .decrypt(GenericArray::from_slice(nonce), ciphertext)
        .map_err(|_| Error::Auth("vault password rejected".to_string()))
}

/// Generate a random salt.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
