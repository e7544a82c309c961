//! Password-based key derivation (PBKDF2-HMAC-SHA256 or Argon2id).

use crate::config::blob_params::{KEY_LENGTH, SALT_LENGTH};
use crate::config::KdfConfig;
use crate::error::{Error, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

/// A 256-bit key wiped from memory on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LENGTH]>;

/// Key derivation bound to one salt.
#[derive(Debug, Clone)]
pub struct KeyDerivation {
    salt: [u8; SALT_LENGTH],
    kdf: KdfConfig,
}

impl KeyDerivation {
    /// Create a new KDF with a fresh random salt.
    pub fn new(kdf: KdfConfig) -> Self {
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        Self { salt, kdf }
    }

    /// Create a KDF from an existing salt (for decryption).
    pub fn from_salt(salt: [u8; SALT_LENGTH], kdf: KdfConfig) -> Self {
        Self { salt, kdf }
    }

    /// Get the salt for storage.
    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    /// Derive a 256-bit key from a password.
    pub fn derive_key(&self, password: &str) -> Result<DerivedKey> {
        let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
        derive_into(&self.kdf, password.as_bytes(), &self.salt, &mut *key)?;
        Ok(key)
    }
}

/// Derive a key with the default PBKDF2-HMAC-SHA256 parameters.
pub fn derive_key(password: &str, salt: &[u8; SALT_LENGTH]) -> Result<DerivedKey> {
    KeyDerivation::from_salt(*salt, KdfConfig::default()).derive_key(password)
}

fn derive_into(kdf: &KdfConfig, password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
    match *kdf {
        KdfConfig::Pbkdf2Sha256 { iterations } => {
            if iterations == 0 {
                return Err(Error::KeyDerivation(
                    "PBKDF2 iterations must be greater than 0".to_string(),
                ));
            }
            pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, out);
            Ok(())
        }
        KdfConfig::Argon2id {
            memory_kib,
            time_cost,
            parallelism,
        } => {
            let params = Params::new(memory_kib, time_cost, parallelism, Some(out.len()))
                .map_err(|e| Error::KeyDerivation(e.to_string()))?;

            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password_into(password, salt, out)
                .map_err(|e| Error::KeyDerivation(e.to_string()))
        }
    }
}
