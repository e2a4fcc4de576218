//! # Fernet Tokens
//!
//! Authenticated symmetric encryption compatible with the Fernet token
//! format, so tokens written here can be read by any other Fernet
//! implementation holding the same key, and vice versa.
//!
//! ## Layout
//!
//! ```text
//! key   = base64url( signing_key[16] | encryption_key[16] )
//! token = base64url( 0x80 | timestamp[8, BE] | iv[16] | AES-128-CBC(PKCS7) | HMAC-SHA256[32] )
//! ```
//!
//! The HMAC covers everything in front of it. The token is kept in its
//! base64 text form; those ASCII bytes are what gets embedded in images.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

use crate::common::error::{Result, StegoError};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Raw key length: 16 bytes signing key followed by 16 bytes encryption key.
pub const KEY_LEN: usize = 32;

const VERSION: u8 = 0x80;
const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const MAC_LEN: usize = 32;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

/// Smallest decoded token: header, one padded block, MAC.
const MIN_TOKEN_LEN: usize = HEADER_LEN + BLOCK_LEN + MAC_LEN;
const MIN_ENCODED_LEN: usize = 4 * ((MIN_TOKEN_LEN + 2) / 3);

/// Tokens stamped further than this into the future are rejected when a TTL applies.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// A 32-byte Fernet key. Zeroized on drop.
pub struct FernetKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FernetKey(..)")
    }
}

impl FernetKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Parse a key from its URL-safe base64 text form.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let raw = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim())
                .map_err(|e| StegoError::Format(format!("key is not base64: {}", e)))?,
        );
        let bytes: [u8; KEY_LEN] = raw.as_slice().try_into().map_err(|_| {
            StegoError::Format(format!("key must be {} bytes, got {}", KEY_LEN, raw.len()))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Fresh random key, independent of any passphrase.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// URL-safe base64 text form of the key.
    pub fn encoded(&self) -> String {
        URL_SAFE.encode(self.bytes.as_slice())
    }

    fn signing_key(&self) -> &[u8] {
        &self.bytes[..KEY_LEN / 2]
    }

    fn encryption_key(&self) -> &[u8] {
        &self.bytes[KEY_LEN / 2..]
    }

    /// Encrypt `plaintext` into a token stamped with the current time and a random IV.
    ///
    /// Two calls with the same input never produce the same token.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);
        let timestamp = chrono::Utc::now().timestamp().max(0) as u64;
        self.encrypt_at(plaintext, timestamp, iv)
    }

    fn encrypt_at(&self, plaintext: &[u8], timestamp: u64, iv: [u8; IV_LEN]) -> Result<Vec<u8>> {
        let ciphertext = Aes128CbcEnc::new_from_slices(self.encryption_key(), &iv)
            .map_err(|e| StegoError::Encryption(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut data = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
        data.push(VERSION);
        data.extend_from_slice(&timestamp.to_be_bytes());
        data.extend_from_slice(&iv);
        data.extend_from_slice(&ciphertext);

        let tag = self.mac(&data)?.finalize().into_bytes();
        data.extend_from_slice(&tag);

        Ok(URL_SAFE.encode(&data).into_bytes())
    }

    /// Verify and decrypt a token.
    ///
    /// With `ttl_secs` set, tokens older than the TTL (or stamped too far in
    /// the future) fail with [`StegoError::TokenExpired`]. The age is only
    /// checked once the MAC has verified, so a tampered token reports
    /// [`StegoError::Authentication`] whatever its timestamp.
    pub fn decrypt(&self, token: &[u8], ttl_secs: Option<u64>) -> Result<Vec<u8>> {
        self.decrypt_at(token, ttl_secs, chrono::Utc::now().timestamp())
    }

    fn decrypt_at(&self, token: &[u8], ttl_secs: Option<u64>, now: i64) -> Result<Vec<u8>> {
        if token.len() < MIN_ENCODED_LEN || token.len() % 4 != 0 {
            return Err(StegoError::Format(format!(
                "token length {} is not a valid Fernet token length",
                token.len()
            )));
        }

        // Past the shape check, anything that fails to decode or verify is
        // treated as corruption of a genuine token.
        let data = URL_SAFE
            .decode(token)
            .map_err(|_| StegoError::Authentication)?;
        if data.len() < MIN_TOKEN_LEN
            || data[0] != VERSION
            || (data.len() - HEADER_LEN - MAC_LEN) % BLOCK_LEN != 0
        {
            return Err(StegoError::Authentication);
        }

        let (signed, tag) = data.split_at(data.len() - MAC_LEN);
        self.mac(signed)?
            .verify_slice(tag)
            .map_err(|_| StegoError::Authentication)?;

        let mut timestamp = [0u8; TIMESTAMP_LEN];
        timestamp.copy_from_slice(&signed[1..1 + TIMESTAMP_LEN]);
        if let Some(ttl) = ttl_secs {
            check_age(u64::from_be_bytes(timestamp), ttl, now)?;
        }

        let iv = &signed[1 + TIMESTAMP_LEN..HEADER_LEN];
        let ciphertext = &signed[HEADER_LEN..];
        Aes128CbcDec::new_from_slices(self.encryption_key(), iv)
            .map_err(|e| StegoError::Format(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| StegoError::Format("invalid PKCS7 padding".to_string()))
    }

    fn mac(&self, data: &[u8]) -> Result<HmacSha256> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.signing_key())
            .map_err(|e| StegoError::Encryption(e.to_string()))?;
        mac.update(data);
        Ok(mac)
    }
}

fn check_age(timestamp: u64, ttl_secs: u64, now: i64) -> Result<()> {
    let timestamp = timestamp as i128;
    let now = now as i128;
    if timestamp + (ttl_secs as i128) < now {
        return Err(StegoError::TokenExpired);
    }
    if now + (MAX_CLOCK_SKEW_SECS as i128) < timestamp {
        return Err(StegoError::TokenExpired);
    }
    Ok(())
}

/// Encoded token length for a plaintext of `plaintext_len` bytes.
pub fn token_len(plaintext_len: usize) -> usize {
    let padded = BLOCK_LEN * (plaintext_len / BLOCK_LEN + 1);
    4 * ((HEADER_LEN + padded + MAC_LEN + 2) / 3)
}

/// Longest plaintext whose token fits in `budget` bytes, if any does.
pub fn max_plaintext_len(budget: usize) -> Option<usize> {
    let raw_budget = budget / 4 * 3;
    if raw_budget < MIN_TOKEN_LEN {
        return None;
    }
    let blocks = (raw_budget - HEADER_LEN - MAC_LEN) / BLOCK_LEN;
    Some(blocks * BLOCK_LEN - 1)
}
