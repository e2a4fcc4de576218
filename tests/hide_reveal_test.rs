use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

use lsb_stego::common::config::{OutputFormat, StegoConfig};
use lsb_stego::processing::carrier;
use lsb_stego::{hide_file, reveal, reveal_file, StegoError};

fn write_carrier(path: &Path, format: ImageFormat) {
    let image = RgbImage::from_fn(64, 48, |x, y| {
        Rgb([(x * 4) as u8, (y * 5) as u8, ((x ^ y) * 3) as u8])
    });
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// Flip the LSB of one flattened channel value in a PNG.
fn flip_slot(png: &[u8], slot: usize) -> Vec<u8> {
    let mut image = carrier::load_rgb(png).unwrap();
    let channels: &mut [u8] = &mut image;
    channels[slot] ^= 1;
    carrier::encode(&image, OutputFormat::Png).unwrap()
}

#[test]
fn test_file_roundtrip_from_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flarp.jpg");
    let output = dir.path().join("output.png");
    write_carrier(&input, ImageFormat::Jpeg);

    let config = StegoConfig::default();
    hide_file(&input, &output, "Cody likes to make things.", "mynameiscody", &config).unwrap();

    let message = reveal_file(&output, "mynameiscody", &config).unwrap();
    assert_eq!(message, "Cody likes to make things.");
}

#[test]
fn test_missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.png");
    let output = dir.path().join("output.png");
    let config = StegoConfig::default();

    assert!(matches!(
        hide_file(&input, &output, "hi", "pass", &config),
        Err(StegoError::NotFound(_))
    ));
    assert!(matches!(
        reveal_file(&input, "pass", &config),
        Err(StegoError::NotFound(_))
    ));
    assert!(!output.exists());
}

#[test]
fn test_wrong_passphrase_and_tampering() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("stego.png");
    write_carrier(&input, ImageFormat::Png);

    let config = StegoConfig::default();
    hide_file(&input, &output, "meet at noon", "right", &config).unwrap();
    let stego = std::fs::read(&output).unwrap();

    assert!(matches!(
        reveal(&stego, "wrong", &config),
        Err(StegoError::Authentication)
    ));

    // A single payload bit
    let tampered = flip_slot(&stego, 32 + 200);
    assert!(matches!(
        reveal(&tampered, "right", &config),
        Err(StegoError::Authentication)
    ));

    // Highest header bit: length far beyond the image
    let tampered = flip_slot(&stego, 0);
    assert!(matches!(
        reveal(&tampered, "right", &config),
        Err(StegoError::InvalidLength { .. })
    ));
}

#[test]
fn test_lossy_reencoding_destroys_message() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("stego.png");
    write_carrier(&input, ImageFormat::Png);

    let config = StegoConfig::default();
    hide_file(&input, &output, "fragile", "pass", &config).unwrap();

    let image = carrier::load_rgb(&std::fs::read(&output).unwrap()).unwrap();
    let mut jpeg = Vec::new();
    image.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg).unwrap();

    assert!(reveal(&jpeg, "pass", &config).is_err());
}

#[test]
fn test_tiff_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cover.bmp");
    let output = dir.path().join("stego.tiff");
    write_carrier(&input, ImageFormat::Bmp);

    let mut config = StegoConfig::default();
    config.output.format = OutputFormat::Tiff;
    hide_file(&input, &output, "tiff carrier", "pass", &config).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Tiff);
    assert_eq!(reveal_file(&output, "pass", &config).unwrap(), "tiff carrier");
}
