//! Length-prefixed frame layout.
//!
//! ```text
//! [4 bytes ] payload length in bytes (big-endian u32)
//! [N bytes ] payload
//! ```
//!
//! Bits are taken most-significant first, prefix before payload.

use crate::config::LENGTH_PREFIX_BYTES;
use crate::error::{Error, Result};

/// Build the frame bytes for a payload.
pub fn build_frame(payload: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| Error::PayloadTooLarge {
        required: payload.len() as u64,
        available: u32::MAX as u64,
    })?;

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Decode the length prefix.
pub fn parse_length(prefix: &[u8]) -> Result<u32> {
    let bytes: [u8; LENGTH_PREFIX_BYTES] = prefix
        .try_into()
        .map_err(|_| Error::CorruptFrame("truncated length prefix".to_string()))?;
    Ok(u32::from_be_bytes(bytes))
}

/// Check a decoded length against the image capacity and the sanity ceiling.
pub fn validate_length(len: u32, capacity: u64, ceiling: u64) -> Result<usize> {
    let len64 = len as u64;
    if len == 0 {
        return Err(Error::CorruptFrame("zero payload length".to_string()));
    }
    if len64 > ceiling {
        return Err(Error::CorruptFrame(format!(
            "payload length {} exceeds limit of {} bytes",
            len, ceiling
        )));
    }
    if len64 > capacity {
        return Err(Error::CorruptFrame(format!(
            "payload length {} exceeds image capacity of {} bytes",
            len, capacity
        )));
    }
    Ok(len as usize)
}

/// Bit `index` of `bytes`, MSB first.
#[inline]
pub fn bit_at(bytes: &[u8], index: usize) -> u8 {
    (bytes[index / 8] >> (7 - index % 8)) & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_frame_prefix() {
        let frame = build_frame(b"HELLO").unwrap();
        assert_eq!(&frame[..4], &[0, 0, 0, 5]);
        assert_eq!(&frame[4..], b"HELLO");
    }

    #[test]
    fn test_prefix_is_big_endian() {
        let payload = vec![0u8; 0x0102];
        let frame = build_frame(&payload).unwrap();
        assert_eq!(&frame[..4], &[0x00, 0x00, 0x01, 0x02]);
        assert_eq!(parse_length(&frame[..4]).unwrap(), 0x0102);
    }

    #[test]
    fn test_parse_length_truncated() {
        assert!(matches!(parse_length(&[0, 1]), Err(Error::CorruptFrame(_))));
    }

    #[test]
    fn test_validate_length_rules() {
        assert!(validate_length(0, 100, 1_000_000).is_err());
        assert!(validate_length(101, 100, 1_000_000).is_err());
        assert!(validate_length(1_000_001, u64::MAX, 1_000_000).is_err());
        assert_eq!(validate_length(100, 100, 1_000_000).unwrap(), 100);
    }

    #[test]
    fn test_bit_order_msb_first() {
        let bits: Vec<u8> = (0..8).map(|i| bit_at(&[0b1010_0001], i)).collect();
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 0, 0, 1]);
    }
}
