//! Encode and decode pipelines.
//!
//! ```text
//! encode: text → UTF-8 → [encrypt] → frame → LSBs of a copy of the image
//! decode: LSBs → frame → [decrypt] → UTF-8 → text
//! ```
//!
//! Both pipelines are pure functions of their inputs. The caller's image is
//! never modified and no key material outlives a call.

use crate::capacity::capacity;
use crate::codec;
use crate::config::blob_params::{NONCE_LENGTH, OVERHEAD, SALT_LENGTH};
use crate::config::StegoConfig;
use crate::crypto::{self, EncryptedBlob};
use crate::error::{Error, Result};
use crate::pixel::ImageBuffer;
use serde::Serialize;
use tracing::{debug, warn};

/// Public header of a payload that is large enough to be an encrypted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobHeader {
    #[serde(serialize_with = "hex::serde::serialize")]
    pub salt: [u8; SALT_LENGTH],
    #[serde(serialize_with = "hex::serde::serialize")]
    pub nonce: [u8; NONCE_LENGTH],
}

/// Summary of the frame hidden in an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    /// Payload length from the prefix, in bytes.
    pub payload_len: usize,
    /// Capacity of the image in bytes.
    pub capacity: u64,
    /// Whether the raw payload is valid UTF-8 (an unencrypted message).
    pub is_utf8: bool,
    /// Salt and nonce, if the payload could be an encrypted blob.
    pub blob: Option<BlobHeader>,
}

/// Hides and recovers text messages in RGBA images.
#[derive(Debug, Clone, Default)]
pub struct Steganographer {
    config: StegoConfig,
}

impl Steganographer {
    /// Create a steganographer with a validated configuration.
    pub fn new(config: StegoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// Largest payload this configuration will embed in an image of the
    /// given size: the image capacity, bounded by the decoder's ceiling.
    pub fn available_capacity(&self, width: u32, height: u32) -> u64 {
        capacity(width, height).min(self.config.max_payload_bytes)
    }

    /// Hide `secret` in a copy of `image`, encrypting it if a password is given.
    ///
    /// The returned image must be stored in a lossless container.
    pub fn encode(&self, image: &ImageBuffer, secret: &str, password: Option<&str>) -> Result<ImageBuffer> {
        let payload = match password {
            Some(password) => {
                crypto::encrypt(secret.as_bytes(), password, &self.config.kdf)?.to_bytes()
            }
            None if secret.is_empty() => return Err(Error::EmptyMessage),
            None => secret.as_bytes().to_vec(),
        };

        let available = self.available_capacity(image.width(), image.height());
        debug!(
            width = image.width(),
            height = image.height(),
            payload_len = payload.len(),
            available,
            encrypted = password.is_some(),
            "encoding payload"
        );

        if payload.len() as u64 > available {
            return Err(Error::PayloadTooLarge {
                required: payload.len() as u64,
                available,
            });
        }

        let mut stego = image.clone();
        codec::write_payload(&mut stego, &payload, self.config.parallel_threshold)?;
        Ok(stego)
    }

    /// Recover the text hidden in `image`.
    ///
    /// With a password the payload must authenticate; without one it is
    /// read as UTF-8 directly.
    pub fn decode(&self, image: &ImageBuffer, password: Option<&str>) -> Result<String> {
        let payload = self.read_payload(image)?;

        let plaintext = match password {
            Some(password) => {
                let blob = EncryptedBlob::from_bytes(&payload)?;
                crypto::decrypt(&blob, password, &self.config.kdf)?
            }
            None => payload,
        };

        Ok(String::from_utf8(plaintext)?)
    }

    /// Describe the hidden frame without decrypting it.
    pub fn inspect(&self, image: &ImageBuffer) -> Result<FrameInfo> {
        let payload = self.read_payload(image)?;

        let blob = if payload.len() >= OVERHEAD {
            EncryptedBlob::from_bytes(&payload).ok().map(|blob| BlobHeader {
                salt: blob.salt,
                nonce: blob.nonce,
            })
        } else {
            None
        };

        Ok(FrameInfo {
            payload_len: payload.len(),
            capacity: capacity(image.width(), image.height()),
            is_utf8: std::str::from_utf8(&payload).is_ok(),
            blob,
        })
    }

    fn read_payload(&self, image: &ImageBuffer) -> Result<Vec<u8>> {
        let payload = codec::read_payload(
            image,
            self.config.max_payload_bytes,
            self.config.parallel_threshold,
        )
        .inspect_err(|e| warn!(width = image.width(), height = image.height(), "no hidden frame: {e}"))?;

        debug!(payload_len = payload.len(), "extracted payload");
        Ok(payload)
    }
}

/// Hide `secret` in `image` with the default configuration.
pub fn encode(image: &ImageBuffer, secret: &str, password: Option<&str>) -> Result<ImageBuffer> {
    Steganographer::default().encode(image, secret, password)
}

/// Recover hidden text from `image` with the default configuration.
pub fn decode(image: &ImageBuffer, password: Option<&str>) -> Result<String> {
    Steganographer::default().decode(image, password)
}

/// Describe the hidden frame in `image` with the default configuration.
pub fn inspect(image: &ImageBuffer) -> Result<FrameInfo> {
    Steganographer::default().inspect(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfConfig;

    fn fast() -> Steganographer {
        Steganographer::new(StegoConfig::with_kdf(KdfConfig::Pbkdf2Sha256 {
            iterations: 1000,
        }))
        .unwrap()
    }

    #[test]
    fn test_hello_roundtrip() {
        let image = ImageBuffer::filled(10, 10, [120, 130, 140, 255]);
        let stego = encode(&image, "HELLO", None).unwrap();
        assert_eq!(decode(&stego, None).unwrap(), "HELLO");
    }

    #[test]
    fn test_input_not_mutated() {
        let image = ImageBuffer::filled(10, 10, [120, 130, 140, 255]);
        let before = image.clone();
        let stego = encode(&image, "HELLO", None).unwrap();
        assert_eq!(image, before);
        assert_ne!(stego, image);
        assert_eq!(stego.width(), image.width());
        assert_eq!(stego.height(), image.height());
    }

    #[test]
    fn test_alpha_preserved() {
        let image = ImageBuffer::filled(10, 10, [1, 2, 3, 77]);
        let stego = encode(&image, "alpha stays", None).unwrap();
        for pixel in stego.as_bytes().chunks(4) {
            assert_eq!(pixel[3], 77);
        }
    }

    #[test]
    fn test_password_roundtrip() {
        let image = ImageBuffer::filled(20, 20, [10, 20, 30, 255]);
        let steg = fast();
        let stego = steg.encode(&image, "secret", Some("pw123")).unwrap();
        assert_eq!(steg.decode(&stego, Some("pw123")).unwrap(), "secret");
        assert!(matches!(
            steg.decode(&stego, Some("wrong")),
            Err(Error::DecryptionFailed)
        ));
    }

    #[test]
    fn test_encrypted_secret_does_not_fit_ten_by_ten() {
        let image = ImageBuffer::filled(10, 10, [10, 20, 30, 255]);
        let err = fast().encode(&image, "secret", Some("pw123")).unwrap_err();
        assert!(matches!(
            err,
            Error::PayloadTooLarge {
                required: 50,
                available: 33
            }
        ));
    }

    #[test]
    fn test_empty_message_rejected_without_password() {
        let image = ImageBuffer::filled(10, 10, [0, 0, 0, 255]);
        assert!(matches!(encode(&image, "", None), Err(Error::EmptyMessage)));
    }

    #[test]
    fn test_empty_message_with_password() {
        let image = ImageBuffer::filled(20, 20, [0, 0, 0, 255]);
        let steg = fast();
        let stego = steg.encode(&image, "", Some("pw")).unwrap();
        assert_eq!(steg.decode(&stego, Some("pw")).unwrap(), "");
    }

    #[test]
    fn test_ceiling_limits_available_capacity() {
        let steg = Steganographer::new(StegoConfig {
            max_payload_bytes: 8,
            ..StegoConfig::default()
        })
        .unwrap();
        let image = ImageBuffer::filled(10, 10, [0, 0, 0, 255]);
        assert_eq!(steg.available_capacity(10, 10), 8);
        assert!(matches!(
            steg.encode(&image, "123456789", None),
            Err(Error::PayloadTooLarge {
                required: 9,
                available: 8
            })
        ));
    }

    #[test]
    fn test_inspect_plain_and_encrypted() {
        let image = ImageBuffer::filled(20, 20, [0, 0, 0, 255]);
        let steg = fast();

        let plain = steg.encode(&image, "HELLO", None).unwrap();
        let info = steg.inspect(&plain).unwrap();
        assert_eq!(info.payload_len, 5);
        assert_eq!(info.capacity, 146);
        assert!(info.is_utf8);
        assert!(info.blob.is_none());

        let encrypted = steg.encode(&image, "HELLO", Some("pw")).unwrap();
        let info = steg.inspect(&encrypted).unwrap();
        assert_eq!(info.payload_len, OVERHEAD + 5);
        assert!(info.blob.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = StegoConfig::with_kdf(KdfConfig::Pbkdf2Sha256 { iterations: 0 });
        assert!(matches!(
            Steganographer::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
