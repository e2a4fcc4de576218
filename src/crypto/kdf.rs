//! Passphrase key derivation
//!
//! PBKDF2-HMAC-SHA256 over the passphrase with a fixed salt. The fixed salt
//! is a known weakness: identical passphrases always yield identical keys,
//! which is exactly what lets a recipient recover the key from the
//! passphrase alone. [`SaltMode::Random`](crate::common::config::SaltMode)
//! trades that property away for per-message salts.

use hmac::Hmac;
use rand::RngCore;
use sha2::Sha256;

use super::fernet::{FernetKey, KEY_LEN};
use crate::common::error::{Result, StegoError};

/// Salt used when no per-message salt is transported.
pub const FIXED_SALT: &[u8] = b"static_salt";

/// PBKDF2 iteration count.
pub const ITERATIONS: u32 = 100_000;

/// Length of a per-message salt in random-salt mode.
pub const RANDOM_SALT_LEN: usize = 16;

/// Derive the cipher key for `passphrase` using the fixed salt.
pub fn derive_key(passphrase: &str) -> Result<FernetKey> {
    derive_key_with_salt(passphrase, FIXED_SALT)
}

/// Derive the cipher key for `passphrase` using an explicit salt.
pub fn derive_key_with_salt(passphrase: &str, salt: &[u8]) -> Result<FernetKey> {
    let mut output = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase.as_bytes(), salt, ITERATIONS, &mut output)
        .map_err(|e| StegoError::KeyDerivation(e.to_string()))?;
    Ok(FernetKey::from_bytes(output))
}

/// Fresh per-message salt for random-salt mode.
pub fn random_salt() -> [u8; RANDOM_SALT_LEN] {
    let mut salt = [0u8; RANDOM_SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
