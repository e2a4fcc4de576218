//! Carrier image decoding and encoding.
//!
//! Hiding always works on 8-bit RGB, whatever the source format. Revealing
//! reads the decoded channel values as they are, so an RGBA or grayscale
//! carrier is flattened with its own channel count.

use image::{ColorType, DynamicImage, RgbImage};
use std::io::Cursor;

use crate::common::config::OutputFormat;
use crate::common::error::{Result, StegoError};

/// Decode any supported format and normalize it to 8-bit RGB.
pub fn load_rgb(bytes: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// Decode without any color conversion.
pub fn load_raw(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Flat channel values of an 8-bit image.
pub fn channels(image: &DynamicImage) -> Result<&[u8]> {
    match image.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => Ok(image.as_bytes()),
        other => Err(StegoError::UnsupportedImage(format!(
            "{:?} has more than 8 bits per channel",
            other
        ))),
    }
}

/// Encode an RGB image with a lossless encoder.
pub fn encode(image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut output_bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut output_bytes), format.image_format())?;
    Ok(output_bytes)
}
