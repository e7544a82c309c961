//! Error types for pixel steganography.

use std::string::FromUtf8Error;
use thiserror::Error;

/// Result type alias for steganography operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while hiding or recovering a message.
#[derive(Error, Debug)]
pub enum Error {
    /// The payload (after encryption, if any) does not fit in the cover image.
    #[error("Payload too large: need {required} bytes, image holds {available} bytes")]
    PayloadTooLarge { required: u64, available: u64 },

    /// No valid hidden frame: the length prefix is zero, implausible, or
    /// larger than the image can hold.
    #[error("No valid hidden frame: {0}")]
    CorruptFrame(String),

    /// Authentication tag mismatch (wrong password or tampered data).
    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    /// The recovered bytes are not valid UTF-8.
    #[error("Recovered payload is not valid UTF-8 text: {0}")]
    InvalidText(#[from] FromUtf8Error),

    /// An unencrypted empty message would produce a zero-length frame.
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// Pixel buffer length does not match the RGBA dimensions.
    #[error("Invalid image buffer: expected {expected} channel bytes, got {actual}")]
    InvalidImage { expected: u64, actual: u64 },

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image container could not be decoded or encoded.
    #[error("Image codec error: {0}")]
    Codec(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Codec(e.to_string())
    }
}
