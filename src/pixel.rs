//! Flat RGBA pixel buffer access.

use crate::config::{BYTES_PER_PIXEL, USABLE_CHANNELS};
use crate::error::{Error, Result};

/// A decoded image as row-major RGBA bytes, 8 bits per channel.
///
/// The buffer length is always `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channels: Vec<u8>,
}

impl ImageBuffer {
    /// Wrap raw RGBA bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, channels: Vec<u8>) -> Result<Self> {
        let actual = channels.len() as u64;
        let expected = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL as u64))
            .ok_or(Error::InvalidImage {
                expected: u64::MAX,
                actual,
            })?;
        if actual != expected {
            return Err(Error::InvalidImage { expected, actual });
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Create an image filled with a single RGBA colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let channels = rgba.iter().copied().cycle().take(pixels * BYTES_PER_PIXEL).collect();
        Self {
            width,
            height,
            channels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of channel bytes (`pixel_count * 4`).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of channels that can carry one hidden bit each.
    pub fn slot_count(&self) -> usize {
        self.pixel_count() * USABLE_CHANNELS
    }

    /// Read a single channel byte.
    pub fn channel(&self, index: usize) -> Option<u8> {
        self.channels.get(index).copied()
    }

    /// Overwrite a single channel byte. Returns `false` if out of range.
    pub fn set_channel(&mut self, index: usize, value: u8) -> bool {
        match self.channels.get_mut(index) {
            Some(channel) => {
                *channel = value;
                true
            }
            None => false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.channels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.channels
    }

    /// Consume the image and return the raw RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.channels
    }
}

/// Map a bit slot to its channel byte index.
///
/// Slots run row-major over pixels, then R, G, B within a pixel.
#[inline]
pub fn slot_to_channel(slot: usize) -> usize {
    (slot / USABLE_CHANNELS) * BYTES_PER_PIXEL + slot % USABLE_CHANNELS
}
