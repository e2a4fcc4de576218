//! # LSB Bit-Plane Codec
//!
//! Writes a ciphertext blob into the least significant bit of each channel
//! value of an 8-bit image, and reads it back.
//!
//! ## Layout
//!
//! The image is viewed as one flat sequence of channel values in row-major,
//! channel-minor order: value `3 * (y * width + x) + c` is channel `c` of
//! pixel `(x, y)`. One bit goes into each value.
//!
//! ```text
//! positions [0, 32)          length header: bit count of the payload, MSB first
//! positions [32, 32 + n)     payload bits, each byte MSB first
//! ```
//!
//! The header counts *bits*, not bytes, so it is always a multiple of 8.
//!
//! ### Capacity
//! An image holds `width * height * 3` bits, 32 of which go to the header.
//! Example: an 800x600 image carries `(1_440_000 - 32) / 8 = 179_996` bytes.

use image::RgbImage;
use log::{debug, log_enabled, trace, Level};

use crate::common::error::{Result, StegoError};

/// Number of LSB slots taken by the length header.
pub const HEADER_BITS: usize = 32;

/// Channels per pixel after normalization.
pub const CHANNELS: usize = 3;

/// Number of payload bits echoed to the trace log.
const TRACE_BITS: usize = 50;

/// Total LSB slots in a `height` x `width` RGB image.
pub fn capacity(height: u32, width: u32) -> u64 {
    height as u64 * width as u64 * CHANNELS as u64
}

/// Embed `blob` into an RGB image, taking ownership and handing it back.
///
/// The image is untouched if the blob does not fit.
pub fn embed(mut image: RgbImage, blob: &[u8]) -> Result<RgbImage> {
    embed_in_place(&mut image, blob)?;
    Ok(image)
}

/// Extract the blob from an RGB image.
pub fn extract(image: &RgbImage) -> Result<Vec<u8>> {
    extract_channels(image.as_raw())
}

/// Embed `blob` into a flat channel buffer.
///
/// Every check runs before the first write: on error the buffer is unchanged.
pub fn embed_in_place(channels: &mut [u8], blob: &[u8]) -> Result<()> {
    let available = channels.len() as u64;
    let message_bits = blob.len() as u64 * 8;
    let required = HEADER_BITS as u64 + message_bits;

    if blob.is_empty() {
        return Err(StegoError::InvalidLength {
            length: 0,
            max: available.saturating_sub(HEADER_BITS as u64),
        });
    }
    if required > available || message_bits > u32::MAX as u64 {
        return Err(StegoError::CapacityExceeded {
            required,
            capacity: available,
        });
    }

    let header = (message_bits as u32).to_be_bytes();
    write_bits(&mut channels[..HEADER_BITS], &header);
    write_bits(&mut channels[HEADER_BITS..], blob);

    debug!(
        "Embedded {} payload bits into {} available slots",
        message_bits, available
    );
    if log_enabled!(Level::Trace) {
        trace!("Length header bits: {:032b}", message_bits);
        trace!("Leading payload bits: {}", bit_string(blob, TRACE_BITS));
    }

    Ok(())
}

/// Read the blob out of a flat channel buffer.
///
/// The buffer is read as-is, whatever its channel count.
pub fn extract_channels(channels: &[u8]) -> Result<Vec<u8>> {
    let max = (channels.len() as u64).saturating_sub(HEADER_BITS as u64);
    if channels.len() < HEADER_BITS {
        return Err(StegoError::InvalidLength { length: 0, max });
    }

    let mut header = [0u8; 4];
    read_bits(&channels[..HEADER_BITS], &mut header);
    let message_bits = u32::from_be_bytes(header) as u64;

    debug!("Extracted length header: {} bits", message_bits);
    if log_enabled!(Level::Trace) {
        trace!("Length header bits: {:032b}", message_bits);
    }

    if message_bits == 0 || message_bits > max || message_bits % 8 != 0 {
        return Err(StegoError::InvalidLength {
            length: message_bits,
            max,
        });
    }

    let payload_end = HEADER_BITS + message_bits as usize;
    let mut blob = vec![0u8; message_bits as usize / 8];
    read_bits(&channels[HEADER_BITS..payload_end], &mut blob);

    if log_enabled!(Level::Trace) {
        trace!("Leading payload bits: {}", bit_string(&blob, TRACE_BITS));
    }

    Ok(blob)
}

/// Write `bytes` MSB-first into the LSBs of `slots`, one bit per slot.
fn write_bits(slots: &mut [u8], bytes: &[u8]) {
    let bits = bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1));

    for (slot, bit) in slots.iter_mut().zip(bits) {
        // Clear LSB and set it to our data bit
        *slot = (*slot & 0xFE) | bit;
    }
}

/// Fill `bytes` MSB-first from the LSBs of `slots`.
fn read_bits(slots: &[u8], bytes: &mut [u8]) {
    for (byte, chunk) in bytes.iter_mut().zip(slots.chunks(8)) {
        *byte = chunk.iter().fold(0u8, |acc, slot| (acc << 1) | (slot & 1));
    }
}

fn bit_string(bytes: &[u8], limit: usize) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:08b}", byte))
        .collect::<String>()
        .chars()
        .take(limit)
        .collect()
}
