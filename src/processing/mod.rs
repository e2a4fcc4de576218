//! # Image Processing and Steganography
//!
//! The LSB bit-plane codec and the image decoding/encoding it relies on.

pub mod carrier;
pub mod steganography;

// Re-export main functions for convenience
pub use steganography::{capacity, embed, extract};
