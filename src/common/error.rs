//! # Error Types
//!
//! Every failure the library can surface, one variant per kind so that
//! callers (the CLI in particular) can tell them apart without parsing
//! messages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("input image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported image layout: {0}")]
    UnsupportedImage(String),

    /// The header plus payload needs more LSB slots than the image has.
    #[error("message is too large for the image: need {required} bits, capacity is {capacity} bits")]
    CapacityExceeded { required: u64, capacity: u64 },

    /// The length header is zero, not byte aligned, or larger than the image.
    #[error("invalid message length: {length} bits (at most {max} bits available)")]
    InvalidLength { length: u64, max: u64 },

    #[error("authentication failed: wrong passphrase or tampered ciphertext")]
    Authentication,

    #[error("malformed ciphertext: {0}")]
    Format(String),

    #[error("decrypted message is not valid UTF-8: {0}")]
    Decoding(#[from] std::string::FromUtf8Error),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("token timestamp is outside the accepted time window")]
    TokenExpired,
}

impl StegoError {
    /// Process exit code for this error kind. Codes 0 to 2 belong to success,
    /// failures outside the library, and command-line usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            StegoError::NotFound(_) => 3,
            StegoError::Io(_) => 4,
            StegoError::Image(_) => 5,
            StegoError::UnsupportedImage(_) => 6,
            StegoError::CapacityExceeded { .. } => 7,
            StegoError::InvalidLength { .. } => 8,
            StegoError::Authentication => 9,
            StegoError::Format(_) => 10,
            StegoError::Decoding(_) => 11,
            StegoError::KeyDerivation(_) => 12,
            StegoError::Encryption(_) => 13,
            StegoError::TokenExpired => 14,
        }
    }
}

/// Result type for steganography operations
pub type Result<T> = std::result::Result<T, StegoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            StegoError::NotFound(PathBuf::from("missing.png")),
            StegoError::Io(std::io::Error::new(std::io::ErrorKind::Other, "io")),
            StegoError::UnsupportedImage("16-bit".to_string()),
            StegoError::CapacityExceeded { required: 40, capacity: 12 },
            StegoError::InvalidLength { length: 0, max: 16 },
            StegoError::Authentication,
            StegoError::Format("short".to_string()),
            StegoError::Decoding(String::from_utf8(vec![0xff]).unwrap_err()),
            StegoError::KeyDerivation("hmac".to_string()),
            StegoError::Encryption("aes".to_string()),
            StegoError::TokenExpired,
        ];

        let codes: HashSet<u8> = errors.iter().map(StegoError::exit_code).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|code| *code > 2));
    }

    #[test]
    fn test_capacity_message_names_both_sizes() {
        let err = StegoError::CapacityExceeded { required: 48, capacity: 12 };
        let text = err.to_string();
        assert!(text.contains("48"));
        assert!(text.contains("12"));
    }
}
