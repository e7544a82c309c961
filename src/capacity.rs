//! Embedding capacity of a cover image.

use crate::config::{LENGTH_PREFIX_BYTES, USABLE_CHANNELS};

/// Maximum payload bytes an image of the given size can carry.
///
/// `floor(width * height * 3 / 8) - 4`, using one bit in each of R, G and B
/// and reserving four bytes for the length prefix. Images too small to hold
/// the prefix have zero capacity.
pub fn capacity(width: u32, height: u32) -> u64 {
    let bits = width as u128 * height as u128 * USABLE_CHANNELS as u128;
    ((bits / 8) as u64).saturating_sub(LENGTH_PREFIX_BYTES as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_by_ten() {
        assert_eq!(capacity(10, 10), 33);
    }

    #[test]
    fn test_tiny_images_have_zero_capacity() {
        assert_eq!(capacity(0, 0), 0);
        assert_eq!(capacity(1, 1), 0);
        // 11 pixels = 33 bits = 4 bytes, exactly the prefix.
        assert_eq!(capacity(11, 1), 0);
        assert_eq!(capacity(11, 2), 4);
    }

    #[test]
    fn test_large_image_does_not_overflow() {
        assert_eq!(
            capacity(u32::MAX, u32::MAX),
            ((u32::MAX as u128 * u32::MAX as u128 * 3) / 8) as u64 - 4
        );
    }
}
