//! Image container collaborator.
//!
//! The steganography core works on decoded [`ImageBuffer`]s only. Turning
//! file bytes into pixels and back is delegated to an [`ImageCodec`].

use crate::error::{Error, Result};
use crate::pixel::ImageBuffer;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Converts between container bytes and RGBA pixel buffers.
pub trait ImageCodec {
    /// Decode container bytes into an RGBA buffer.
    fn decode_container(&self, bytes: &[u8]) -> Result<ImageBuffer>;

    /// Encode an RGBA buffer. Implementations must be lossless.
    fn encode_container(&self, image: &ImageBuffer) -> Result<Vec<u8>>;
}

/// Reads any format enabled in the `image` crate, always writes PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode_container(&self, bytes: &[u8]) -> Result<ImageBuffer> {
        let rgba = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = rgba.dimensions();
        ImageBuffer::new(width, height, rgba.into_raw())
    }

    fn encode_container(&self, image: &ImageBuffer) -> Result<Vec<u8>> {
        let rgba = RgbaImage::from_raw(image.width(), image.height(), image.as_bytes().to_vec())
            .ok_or_else(|| Error::Codec("pixel buffer does not match dimensions".to_string()))?;

        let mut bytes = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Read and decode an image file.
pub fn load_image(codec: &impl ImageCodec, path: &Path) -> Result<ImageBuffer> {
    let bytes = std::fs::read(path)?;
    codec.decode_container(&bytes)
}

/// Encode and write an image file.
pub fn save_image(codec: &impl ImageCodec, image: &ImageBuffer, path: &Path) -> Result<()> {
    let bytes = codec.encode_container(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
