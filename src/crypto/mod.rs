//! # Key & Cipher Layer
//!
//! Turns a passphrase and a text message into an opaque, self-verifying
//! ciphertext blob and back.
//!
//! - [`kdf`]: PBKDF2-HMAC-SHA256 key derivation
//! - [`fernet`]: the authenticated token format
//!
//! With the default fixed salt the blob is exactly a Fernet token. In
//! random-salt mode the blob is `salt[16] | token`.

pub mod fernet;
pub mod kdf;

use crate::common::config::{CipherConfig, SaltMode};
use crate::common::error::{Result, StegoError};

pub use fernet::FernetKey;
pub use kdf::derive_key;

/// Encrypt `plaintext` under a key derived from `passphrase` with the fixed salt.
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<Vec<u8>> {
    encrypt_with(plaintext, passphrase, &CipherConfig::default())
}

/// Decrypt a blob produced by [`encrypt`].
pub fn decrypt(blob: &[u8], passphrase: &str) -> Result<String> {
    decrypt_with(blob, passphrase, &CipherConfig::default())
}

/// Encrypt under the configured salt mode.
///
/// In random-salt mode the returned blob is `salt | token`.
pub fn encrypt_with(plaintext: &str, passphrase: &str, config: &CipherConfig) -> Result<Vec<u8>> {
    match config.salt_mode {
        SaltMode::Fixed => derive_key(passphrase)?.encrypt(plaintext.as_bytes()),
        SaltMode::Random => {
            let salt = kdf::random_salt();
            let token = kdf::derive_key_with_salt(passphrase, &salt)?.encrypt(plaintext.as_bytes())?;
            let mut blob = Vec::with_capacity(salt.len() + token.len());
            blob.extend_from_slice(&salt);
            blob.extend_from_slice(&token);
            Ok(blob)
        }
    }
}

/// Decrypt a blob produced by [`encrypt_with`] with the same cipher settings.
///
/// # Errors
/// - [`StegoError::Authentication`]: wrong passphrase or tampered blob
/// - [`StegoError::Format`]: blob is not shaped like a token
/// - [`StegoError::TokenExpired`]: older than the configured TTL
/// - [`StegoError::Decoding`]: plaintext is not UTF-8
pub fn decrypt_with(blob: &[u8], passphrase: &str, config: &CipherConfig) -> Result<String> {
    let plaintext = match config.salt_mode {
        SaltMode::Fixed => derive_key(passphrase)?.decrypt(blob, config.ttl_secs)?,
        SaltMode::Random => {
            if blob.len() < kdf::RANDOM_SALT_LEN {
                return Err(StegoError::Format(format!(
                    "blob of {} bytes is shorter than its salt",
                    blob.len()
                )));
            }
            let (salt, token) = blob.split_at(kdf::RANDOM_SALT_LEN);
            kdf::derive_key_with_salt(passphrase, salt)?.decrypt(token, config.ttl_secs)?
        }
    };
    Ok(String::from_utf8(plaintext)?)
}

/// Blob length produced for a plaintext of `plaintext_len` bytes.
pub fn blob_len(plaintext_len: usize, config: &CipherConfig) -> usize {
    salt_overhead(config) + fernet::token_len(plaintext_len)
}

/// Longest plaintext whose blob fits in `budget` bytes.
pub fn max_plaintext_len(budget: usize, config: &CipherConfig) -> Option<usize> {
    budget
        .checked_sub(salt_overhead(config))
        .and_then(fernet::max_plaintext_len)
}

fn salt_overhead(config: &CipherConfig) -> usize {
    match config.salt_mode {
        SaltMode::Fixed => 0,
        SaltMode::Random => kdf::RANDOM_SALT_LEN,
    }
}
