//! Writes frame bits into channel LSBs.

use crate::capacity::capacity;
use crate::codec::frame::bit_at;
use crate::config::{BYTES_PER_PIXEL, LENGTH_PREFIX_BYTES, USABLE_CHANNELS};
use crate::error::{Error, Result};
use crate::pixel::ImageBuffer;
use rayon::prelude::*;

/// Embed `frame` into the R, G, B least-significant bits of `image`.
///
/// Pixels are visited row-major and bits consumed in R, G, B order. Channels
/// past the end of the frame, and every alpha channel, are left untouched.
/// Nothing is written if the frame does not fit; the error reports payload
/// bytes (frame minus length prefix) against [`capacity`].
pub fn embed_frame(image: &mut ImageBuffer, frame: &[u8], parallel_threshold: usize) -> Result<()> {
    let total_bits = frame.len() * 8;
    if total_bits > image.slot_count() {
        return Err(Error::PayloadTooLarge {
            required: frame.len().saturating_sub(LENGTH_PREFIX_BYTES) as u64,
            available: capacity(image.width(), image.height()),
        });
    }

    let pixels_needed = total_bits.div_ceil(USABLE_CHANNELS);
    let region = &mut image.as_bytes_mut()[..pixels_needed * BYTES_PER_PIXEL];

    if pixels_needed > parallel_threshold {
        region
            .par_chunks_mut(BYTES_PER_PIXEL)
            .enumerate()
            .for_each(|(pixel, rgba)| embed_pixel(frame, total_bits, pixel, rgba));
    } else {
        region
            .chunks_mut(BYTES_PER_PIXEL)
            .enumerate()
            .for_each(|(pixel, rgba)| embed_pixel(frame, total_bits, pixel, rgba));
    }

    Ok(())
}

#[inline]
fn embed_pixel(frame: &[u8], total_bits: usize, pixel: usize, rgba: &mut [u8]) {
    let first_slot = pixel * USABLE_CHANNELS;
    for (offset, channel) in rgba.iter_mut().take(USABLE_CHANNELS).enumerate() {
        let slot = first_slot + offset;
        if slot >= total_bits {
            break;
        }
        *channel = (*channel & 0xFE) | bit_at(frame, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_sets_lsbs_in_rgb_order() {
        let mut image = ImageBuffer::filled(3, 1, [0xFF, 0xFF, 0xFF, 0x80]);
        // 0b0101_1010 -> slots 0..8
        embed_frame(&mut image, &[0x5A], usize::MAX).unwrap();
        assert_eq!(
            image.as_bytes(),
            &[
                0xFE, 0xFF, 0xFE, 0x80, // 0 1 0
                0xFF, 0xFF, 0xFE, 0x80, // 1 1 0
                0xFF, 0xFE, 0xFF, 0x80, // 1 0, blue untouched
            ][..]
        );
    }

    #[test]
    fn test_embed_leaves_tail_untouched() {
        let mut image = ImageBuffer::filled(4, 1, [0x10, 0x11, 0x12, 0x13]);
        embed_frame(&mut image, &[0xFF], usize::MAX).unwrap();
        let bytes = image.as_bytes();
        // Eight bits fill pixels 0, 1 and the R, G of pixel 2.
        assert_eq!(&bytes[8..12], &[0x11, 0x11, 0x12, 0x13]);
        assert_eq!(&bytes[12..16], &[0x10, 0x11, 0x12, 0x13]);
    }

    #[test]
    fn test_embed_too_large_leaves_image_unchanged() {
        let mut image = ImageBuffer::filled(2, 1, [7, 7, 7, 7]);
        let before = image.clone();
        let err = embed_frame(&mut image, &[1], usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            Error::PayloadTooLarge {
                required: 0,
                available: 0
            }
        ));
        assert_eq!(image, before);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let frame: Vec<u8> = (0..=255u8).collect();
        let mut sequential = ImageBuffer::filled(64, 16, [0x33, 0x66, 0x99, 0xCC]);
        let mut parallel = sequential.clone();

        embed_frame(&mut sequential, &frame, usize::MAX).unwrap();
        embed_frame(&mut parallel, &frame, 0).unwrap();

        assert_eq!(sequential, parallel);
    }
}
