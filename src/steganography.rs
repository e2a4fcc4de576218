//! # Hide / Reveal
//!
//! End-to-end operations: decode the carrier, encrypt, embed, encode, and
//! the reverse. Image bytes in, image bytes out; the `_file` variants add
//! the filesystem around them.

use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::common::config::StegoConfig;
use crate::common::error::{Result, StegoError};
use crate::crypto;
use crate::processing::carrier;
use crate::processing::steganography::{self as codec, HEADER_BITS};

/// How much an image can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    /// LSB slots in the RGB-normalized image
    pub capacity_bits: u64,
    /// Slots left after the length header
    pub payload_bits: u64,
    pub max_blob_bytes: u64,
    /// Longest message that fits under the configured cipher settings
    pub max_message_bytes: Option<usize>,
}

/// Hide `message` in the image given as encoded bytes.
///
/// Returns the carrier re-encoded losslessly in the configured output format.
pub fn hide(image_bytes: &[u8], message: &str, passphrase: &str, config: &StegoConfig) -> Result<Vec<u8>> {
    let image = carrier::load_rgb(image_bytes)?;
    let (width, height) = image.dimensions();
    debug!(
        "Carrier is {}x{} ({} LSB slots)",
        width,
        height,
        codec::capacity(height, width)
    );

    let blob = crypto::encrypt_with(message, passphrase, &config.cipher)?;
    debug!("Encrypted message length: {} bits", blob.len() * 8);

    let image = codec::embed(image, &blob)?;
    carrier::encode(&image, config.output.format)
}

/// Recover the message hidden in the image given as encoded bytes.
pub fn reveal(image_bytes: &[u8], passphrase: &str, config: &StegoConfig) -> Result<String> {
    let image = carrier::load_raw(image_bytes)?;
    let blob = codec::extract_channels(carrier::channels(&image)?)?;
    debug!("Extracted {} byte ciphertext", blob.len());

    crypto::decrypt_with(&blob, passphrase, &config.cipher)
}

/// Report the carrying capacity of an image.
pub fn inspect(image_bytes: &[u8], config: &StegoConfig) -> Result<CapacityReport> {
    let image = carrier::load_rgb(image_bytes)?;
    let (width, height) = image.dimensions();
    let capacity_bits = codec::capacity(height, width);
    let payload_bits = capacity_bits.saturating_sub(HEADER_BITS as u64);
    let max_blob_bytes = (payload_bits / 8).min(u32::MAX as u64 / 8);

    Ok(CapacityReport {
        width,
        height,
        capacity_bits,
        payload_bits,
        max_blob_bytes,
        max_message_bytes: crypto::max_plaintext_len(max_blob_bytes as usize, &config.cipher),
    })
}

/// Hide `message` in the image at `input` and write the result to `output`.
///
/// # Errors
/// - [`StegoError::NotFound`]: `input` does not exist
/// - [`StegoError::Image`]: `input` cannot be decoded
/// - [`StegoError::CapacityExceeded`]: the encrypted message does not fit
/// - [`StegoError::Io`]: reading or writing failed
pub fn hide_file(
    input: &Path,
    output: &Path,
    message: &str,
    passphrase: &str,
    config: &StegoConfig,
) -> Result<()> {
    let image_bytes = read_existing(input)?;
    let output_bytes = hide(&image_bytes, message, passphrase, config)?;
    fs::write(output, output_bytes)?;

    info!("Message hidden in {}", output.display());
    Ok(())
}

/// Recover the message hidden in the image at `input`.
///
/// # Errors
/// - [`StegoError::NotFound`]: `input` does not exist
/// - [`StegoError::InvalidLength`]: no readable length header
/// - [`StegoError::Authentication`]: wrong passphrase or tampered image
/// - [`StegoError::Format`] / [`StegoError::Decoding`]: malformed ciphertext or plaintext
pub fn reveal_file(input: &Path, passphrase: &str, config: &StegoConfig) -> Result<String> {
    let image_bytes = read_existing(input)?;
    let message = reveal(&image_bytes, passphrase, config)?;

    info!("Message revealed from {}", input.display());
    Ok(message)
}

/// Capacity report for the image at `input`.
pub fn inspect_file(input: &Path, config: &StegoConfig) -> Result<CapacityReport> {
    inspect(&read_existing(input)?, config)
}

fn read_existing(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StegoError::NotFound(path.to_path_buf()),
        _ => StegoError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::{OutputFormat, SaltMode};
    use image::{Rgb, RgbImage};

    fn carrier_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) * 7) as u8])
        });
        carrier::encode(&image, OutputFormat::Png).unwrap()
    }

    #[test]
    fn test_hide_reveal_roundtrip() {
        let config = StegoConfig::default();
        let stego = hide(&carrier_png(40, 30), "Cody likes to make things.", "mynameiscody", &config).unwrap();
        let message = reveal(&stego, "mynameiscody", &config).unwrap();
        assert_eq!(message, "Cody likes to make things.");
    }

    #[test]
    fn test_hide_into_tiny_image_fails() {
        let result = hide(&carrier_png(2, 2), "hi", "pass", &StegoConfig::default());
        assert!(matches!(result, Err(StegoError::CapacityExceeded { capacity: 12, .. })));
    }

    #[test]
    fn test_reveal_untouched_image_is_invalid_length() {
        // All LSBs of a black image are zero, so the header reads as zero
        let blank = carrier::encode(&RgbImage::new(20, 20), OutputFormat::Png).unwrap();
        let result = reveal(&blank, "pass", &StegoConfig::default());
        assert!(matches!(result, Err(StegoError::InvalidLength { length: 0, .. })));
    }

    #[test]
    fn test_random_salt_hide_reveal() {
        let mut config = StegoConfig::default();
        config.cipher.salt_mode = SaltMode::Random;
        config.output.format = OutputFormat::Bmp;

        let stego = hide(&carrier_png(40, 30), "salted", "pass", &config).unwrap();
        assert_eq!(reveal(&stego, "pass", &config).unwrap(), "salted");
    }

    #[test]
    fn test_read_existing_maps_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(read_existing(&missing), Err(StegoError::NotFound(p)) if p == missing));

        // A directory exists but cannot be read as a file
        assert!(matches!(read_existing(dir.path()), Err(StegoError::Io(_))));
    }

    #[test]
    fn test_inspect_report() {
        let report = inspect(&carrier_png(40, 30), &StegoConfig::default()).unwrap();

        assert_eq!(report.capacity_bits, 3600);
        assert_eq!(report.payload_bits, 3568);
        assert_eq!(report.max_blob_bytes, 446);
        let max = report.max_message_bytes.unwrap();
        assert!(crypto::blob_len(max, &StegoConfig::default().cipher) <= 446);
        assert!(crypto::blob_len(max + 1, &StegoConfig::default().cipher) > 446);
    }

    #[test]
    fn test_inspect_too_small_for_any_message() {
        let report = inspect(&carrier_png(4, 4), &StegoConfig::default()).unwrap();
        assert_eq!(report.max_blob_bytes, 2);
        assert_eq!(report.max_message_bytes, None);
    }
}
