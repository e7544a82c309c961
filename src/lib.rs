//! Pixel Steganography
//!
//! Hides a text message in the least-significant bits of an RGBA image and
//! recovers it bit-exactly, optionally protected by a password.
//!
//! # Features
//!
//! - **LSB framing**: 32-bit big-endian length prefix, one bit per R/G/B channel
//! - **AES-256-GCM Encryption**: authenticated encryption with PBKDF2-HMAC-SHA256
//!   (or Argon2id) key derivation
//! - **Corrupt frame detection**: implausible length prefixes are rejected
//!   before any extraction
//! - **CLI Interface**: encode, decode and inspect PNG files
//!
//! # Architecture
//!
//! ```text
//! Text → UTF-8 → Encrypt (AES-256-GCM, optional) → Frame → Embed (R/G/B LSBs)
//! ```
//!
//! # Example
//!
//! ```rust
//! use pixel_stego::{capacity, decode, encode, ImageBuffer};
//!
//! let cover = ImageBuffer::filled(10, 10, [200, 180, 160, 255]);
//! assert_eq!(capacity(10, 10), 33);
//!
//! let stego = encode(&cover, "HELLO", None).unwrap();
//! assert_eq!(decode(&stego, None).unwrap(), "HELLO");
//! ```

pub mod capacity;
pub mod codec;
pub mod config;
pub mod container;
pub mod crypto;
pub mod error;
pub mod pixel;
pub mod stego;

pub use capacity::capacity;
pub use config::{KdfConfig, StegoConfig};
pub use container::{ImageCodec, PngCodec};
pub use error::{Error, Result};
pub use pixel::ImageBuffer;
pub use stego::{decode, encode, inspect, BlobHeader, FrameInfo, Steganographer};
