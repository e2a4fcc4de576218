//! # LSB Stego
//!
//! Hides a passphrase-encrypted text message in the least significant bits
//! of an RGB image, and recovers it.
//!
//! ```no_run
//! use lsb_stego::{hide, reveal, StegoConfig};
//!
//! # fn main() -> lsb_stego::Result<()> {
//! let config = StegoConfig::default();
//! let carrier = std::fs::read("cover.jpg")?;
//! let stego = hide(&carrier, "Secret message", "passphrase", &config)?;
//! assert_eq!(reveal(&stego, "passphrase", &config)?, "Secret message");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `crypto`: passphrase key derivation and authenticated encryption
//! - `processing`: the LSB bit-plane codec and carrier image handling
//! - `steganography`: hide/reveal entry points
//! - `common`: configuration and errors

pub mod common;
pub mod crypto;
pub mod processing;
pub mod steganography;

pub use common::config::StegoConfig;
pub use common::error::{Result, StegoError};
pub use steganography::{hide, hide_file, inspect, reveal, reveal_file, CapacityReport};
