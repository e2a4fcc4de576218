//! # Common Components
//!
//! Shared utilities used by the library entry points and the CLI.
//!
//! ## Modules
//!
//! - [`config`]: Configuration structures and TOML loading
//! - [`error`]: Error taxonomy shared by every layer

pub mod config;
pub mod error;

pub use error::{Result, StegoError};
