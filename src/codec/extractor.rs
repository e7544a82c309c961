//! Reads frame bits back out of channel LSBs.

use crate::config::USABLE_CHANNELS;
use crate::error::{Error, Result};
use crate::pixel::{slot_to_channel, ImageBuffer};
use rayon::prelude::*;

/// Read `len` bytes starting at bit slot `first_slot`.
///
/// Mirrors [`embed_frame`](super::embed_frame): row-major pixels, R, G, B
/// channels, most-significant bit first.
pub fn extract_bytes(
    image: &ImageBuffer,
    first_slot: usize,
    len: usize,
    parallel_threshold: usize,
) -> Result<Vec<u8>> {
    let end = len
        .checked_mul(8)
        .and_then(|bits| bits.checked_add(first_slot))
        .filter(|&end| end <= image.slot_count())
        .ok_or_else(|| {
            Error::CorruptFrame(format!(
                "frame of {} bytes runs past the end of a {}x{} image",
                len,
                image.width(),
                image.height()
            ))
        })?;

    let channels = image.as_bytes();
    let pixels_touched = (end - first_slot).div_ceil(USABLE_CHANNELS);

    let bytes = if pixels_touched > parallel_threshold {
        (0..len)
            .into_par_iter()
            .map(|i| read_byte(channels, first_slot + i * 8))
            .collect()
    } else {
        (0..len)
            .map(|i| read_byte(channels, first_slot + i * 8))
            .collect()
    };

    Ok(bytes)
}

#[inline]
fn read_byte(channels: &[u8], first_slot: usize) -> u8 {
    (first_slot..first_slot + 8).fold(0u8, |acc, slot| {
        (acc << 1) | (channels[slot_to_channel(slot)] & 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::embed_frame;

    #[test]
    fn test_extract_reads_lsbs() {
        let image = ImageBuffer::new(
            3,
            1,
            vec![
                0xFE, 0xFF, 0xFE, 0x80, //
                0xFF, 0xFF, 0xFE, 0x80, //
                0xFF, 0xFE, 0xFF, 0x80,
            ],
        )
        .unwrap();
        assert_eq!(extract_bytes(&image, 0, 1, usize::MAX).unwrap(), vec![0x5A]);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let mut image = ImageBuffer::filled(8, 1, [0, 0, 0, 0]);
        for pixel in 0..8 {
            image.set_channel(pixel * 4 + 3, 0xFF);
        }
        assert_eq!(extract_bytes(&image, 0, 3, usize::MAX).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_extract_at_offset() {
        let mut image = ImageBuffer::filled(16, 1, [0x40, 0x40, 0x40, 0xFF]);
        embed_frame(&mut image, &[0x00, 0x00, 0x00, 0x02, 0xAB, 0xCD], usize::MAX).unwrap();
        assert_eq!(extract_bytes(&image, 32, 2, usize::MAX).unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_extract_past_end_is_corrupt() {
        let image = ImageBuffer::filled(2, 2, [0, 0, 0, 0]);
        assert!(matches!(
            extract_bytes(&image, 0, 2, usize::MAX),
            Err(Error::CorruptFrame(_))
        ));
        assert!(matches!(
            extract_bytes(&image, usize::MAX, 1, usize::MAX),
            Err(Error::CorruptFrame(_))
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut image = ImageBuffer::filled(32, 32, [0x12, 0x34, 0x56, 0x78]);
        let frame: Vec<u8> = (0..200u8).map(|b| b.wrapping_mul(37)).collect();
        embed_frame(&mut image, &frame, usize::MAX).unwrap();

        let sequential = extract_bytes(&image, 0, frame.len(), usize::MAX).unwrap();
        let parallel = extract_bytes(&image, 0, frame.len(), 0).unwrap();
        assert_eq!(sequential, frame);
        assert_eq!(parallel, frame);
    }
}
