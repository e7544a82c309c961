//! Configuration constants and types for pixel steganography.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bytes per pixel in the flattened RGBA buffer.
pub const BYTES_PER_PIXEL: usize = 4;

/// Channels per pixel that carry hidden bits (R, G, B; alpha is skipped).
pub const USABLE_CHANNELS: usize = 3;

/// Size of the big-endian payload length prefix in bytes.
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Size of the length prefix in bits.
pub const LENGTH_PREFIX_BITS: usize = LENGTH_PREFIX_BYTES * 8;

/// Largest payload length a decoder accepts before treating the frame as corrupt.
pub const MAX_PAYLOAD_BYTES: u64 = 1_000_000;

/// Pixel count above which embedding and extraction run in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 65_536;

/// Layout of the encrypted payload blob.
pub mod blob_params {
    /// Salt length in bytes.
    pub const SALT_LENGTH: usize = 16;

    /// AES-GCM nonce length in bytes (96 bits).
    pub const NONCE_LENGTH: usize = 12;

    /// AES-GCM authentication tag length in bytes (128 bits).
    pub const TAG_LENGTH: usize = 16;

    /// Derived key length in bytes (256 bits).
    pub const KEY_LENGTH: usize = 32;

    /// Fixed overhead added to the plaintext by encryption.
    pub const OVERHEAD: usize = SALT_LENGTH + NONCE_LENGTH + TAG_LENGTH;
}

/// PBKDF2-HMAC-SHA256 parameters for key derivation.
pub mod pbkdf2_params {
    /// Default iteration count.
    pub const ITERATIONS: u32 = 100_000;
}

/// Argon2id parameters for key derivation.
pub mod argon2_params {
    /// Memory cost in KiB (64 MB).
    pub const MEMORY_COST: u32 = 65536;

    /// Time cost (iterations).
    pub const TIME_COST: u32 = 3;

    /// Parallelism factor.
    pub const PARALLELISM: u32 = 4;

    /// Largest parallelism Argon2 accepts (2^24 - 1 lanes).
    pub const MAX_PARALLELISM: u32 = 0x00FF_FFFF;
}

/// Password-based key derivation function.
///
/// The choice is not stored in the encrypted blob, so the encoder and the
/// decoder must be configured with the same variant and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfConfig {
    /// PBKDF2 with HMAC-SHA256.
    Pbkdf2Sha256 { iterations: u32 },
    /// Argon2id (v1.3).
    Argon2id {
        memory_kib: u32,
        time_cost: u32,
        parallelism: u32,
    },
}

impl Default for KdfConfig {
    fn default() -> Self {
        KdfConfig::Pbkdf2Sha256 {
            iterations: pbkdf2_params::ITERATIONS,
        }
    }
}

impl KdfConfig {
    /// Argon2id with the default cost parameters.
    pub fn argon2id() -> Self {
        KdfConfig::Argon2id {
            memory_kib: argon2_params::MEMORY_COST,
            time_cost: argon2_params::TIME_COST,
            parallelism: argon2_params::PARALLELISM,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            KdfConfig::Pbkdf2Sha256 { iterations } if iterations == 0 => Err(
                Error::InvalidConfig("PBKDF2 iterations must be greater than 0".to_string()),
            ),
            KdfConfig::Argon2id {
                memory_kib,
                time_cost,
                parallelism,
            } => {
                if time_cost == 0 || parallelism == 0 {
                    return Err(Error::InvalidConfig(
                        "Argon2 time cost and parallelism must be greater than 0".to_string(),
                    ));
                }
                if parallelism > argon2_params::MAX_PARALLELISM {
                    return Err(Error::InvalidConfig(format!(
                        "Argon2 parallelism cannot exceed {}",
                        argon2_params::MAX_PARALLELISM
                    )));
                }
                let min_memory = parallelism.checked_mul(8).ok_or_else(|| {
                    Error::InvalidConfig(format!("Argon2 parallelism {} is too large", parallelism))
                })?;
                if memory_kib < min_memory {
                    return Err(Error::InvalidConfig(format!(
                        "Argon2 memory must be at least {} KiB for parallelism {}",
                        min_memory, parallelism
                    )));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Configuration for encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Key derivation used when a password is supplied.
    pub kdf: KdfConfig,

    /// Sanity ceiling on the payload length prefix.
    pub max_payload_bytes: u64,

    /// Images with more pixels than this are processed with rayon.
    pub parallel_threshold: usize,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            kdf: KdfConfig::default(),
            max_payload_bytes: MAX_PAYLOAD_BYTES,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl StegoConfig {
    /// Create a configuration with a custom KDF and default limits.
    pub fn with_kdf(kdf: KdfConfig) -> Self {
        Self {
            kdf,
            ..Self::default()
        }
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StegoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()?;
        if self.max_payload_bytes == 0 {
            return Err(Error::InvalidConfig(
                "Maximum payload size must be greater than 0".to_string(),
            ));
        }
        if self.max_payload_bytes > u32::MAX as u64 {
            return Err(Error::InvalidConfig(format!(
                "Maximum payload size cannot exceed {} bytes",
                u32::MAX
            )));
        }
        Ok(())
    }
}
