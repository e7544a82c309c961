//! Bit framing and LSB embedding.
//!
//! A payload is wrapped in a [`frame`] (32-bit big-endian byte count followed
//! by the payload bytes) and written one bit per R, G, B channel.
//!
//! Only lossless containers preserve the hidden bits. Saving an encoded image
//! through a lossy codec destroys the frame and cannot be detected here
//! beyond the decoder reporting [`Error::CorruptFrame`](crate::Error::CorruptFrame).

mod embedder;
mod extractor;
pub mod frame;

pub use embedder::embed_frame;
pub use extractor::extract_bytes;

use crate::capacity::capacity;
use crate::config::{LENGTH_PREFIX_BITS, LENGTH_PREFIX_BYTES};
use crate::error::Result;
use crate::pixel::ImageBuffer;

/// Frame `payload` and embed it into `image`.
pub fn write_payload(image: &mut ImageBuffer, payload: &[u8], parallel_threshold: usize) -> Result<()> {
    let frame = frame::build_frame(payload)?;
    embed_frame(image, &frame, parallel_threshold)
}

/// Read and validate the length prefix of the hidden frame.
pub fn read_length(image: &ImageBuffer, max_payload_bytes: u64) -> Result<usize> {
    let prefix = extract_bytes(image, 0, LENGTH_PREFIX_BYTES, usize::MAX)?;
    let len = frame::parse_length(&prefix)?;
    frame::validate_length(len, capacity(image.width(), image.height()), max_payload_bytes)
}

/// Extract the payload of the hidden frame.
pub fn read_payload(image: &ImageBuffer, max_payload_bytes: u64, parallel_threshold: usize) -> Result<Vec<u8>> {
    let len = read_length(image, max_payload_bytes)?;
    extract_bytes(image, LENGTH_PREFIX_BITS, len, parallel_threshold)
}
