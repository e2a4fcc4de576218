//! # Configuration Utilities
//!
//! Settings shared by the library entry points and the CLI. Every field has
//! a default, so a configuration file is optional and may be partial.

use anyhow::Result;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fs;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/stego.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Top-level configuration for hiding and revealing messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub output: OutputConfig,
    pub cipher: CipherConfig,
}

/// How carrier images are written back out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Encoding for the stego image. Only lossless formats are offered,
    /// any re-quantization would destroy the embedded bits.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Encoder format handed to the `image` crate.
    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Key derivation and token settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub salt_mode: SaltMode,
    /// Reject tokens older than this many seconds when revealing.
    pub ttl_secs: Option<u64>,
}

/// Where the PBKDF2 salt comes from.
///
/// `Fixed` derives the key from the passphrase alone, so any peer that knows
/// the passphrase can recover the message. `Random` draws a fresh salt per
/// message and stores it in front of the token; images produced this way can
/// only be read by a peer that is also configured for `Random`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaltMode {
    #[default]
    Fixed,
    Random,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: StegoConfig = toml::from_str("").unwrap();
        assert_eq!(config.output.format, OutputFormat::Png);
        assert_eq!(config.cipher.salt_mode, SaltMode::Fixed);
        assert_eq!(config.cipher.ttl_secs, None);
    }

    #[test]
    fn test_partial_config() {
        let config: StegoConfig = toml::from_str(
            r#"
            [cipher]
            salt_mode = "random"
            ttl_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.output.format, OutputFormat::Png);
        assert_eq!(config.cipher.salt_mode, SaltMode::Random);
        assert_eq!(config.cipher.ttl_secs, Some(600));
    }

    #[test]
    fn test_lossy_format_rejected() {
        let result: std::result::Result<StegoConfig, _> = toml::from_str(
            r#"
            [output]
            format = "jpeg"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"bmp\"").unwrap();

        let config: StegoConfig = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Bmp);
        assert_eq!(config.output.format.image_format(), ImageFormat::Bmp);
    }
}
