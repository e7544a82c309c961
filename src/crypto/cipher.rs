//! AES-256-GCM authenticated encryption of payloads.

use crate::config::blob_params::{NONCE_LENGTH, OVERHEAD, SALT_LENGTH};
use crate::config::KdfConfig;
use crate::crypto::kdf::KeyDerivation;
use crate::error::{Error, Result};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::RngCore;

/// AES-256-GCM cipher wrapper.
pub struct Cipher {
    cipher: Aes256Gcm,
}

impl Cipher {
    /// Create a new cipher from a derived key.
    pub fn new(key: &[u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        Self { cipher }
    }

    /// Encrypt with no associated data. Returns ciphertext || tag.
    pub fn encrypt(&self, nonce: &[u8; NONCE_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| Error::Encryption(e.to_string()))
    }

    /// Decrypt ciphertext || tag. Any tag mismatch is `DecryptionFailed`.
    pub fn decrypt(&self, nonce: &[u8; NONCE_LENGTH], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::DecryptionFailed)
    }
}

/// Self-describing encrypted payload: `salt || nonce || ciphertext_with_tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// Salt for key derivation.
    pub salt: [u8; SALT_LENGTH],
    /// AES-GCM nonce.
    pub nonce: [u8; NONCE_LENGTH],
    /// Ciphertext with the trailing 16-byte tag.
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Total serialized size.
    pub fn size(&self) -> usize {
        SALT_LENGTH + NONCE_LENGTH + self.ciphertext.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split a serialized blob at its fixed offsets.
    ///
    /// Anything shorter than salt + nonce + tag cannot authenticate and is
    /// reported as `DecryptionFailed`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < OVERHEAD {
            return Err(Error::DecryptionFailed);
        }

        let (salt, rest) = bytes.split_at(SALT_LENGTH);
        let (nonce, ciphertext) = rest.split_at(NONCE_LENGTH);

        Ok(Self {
            salt: salt.try_into().map_err(|_| Error::DecryptionFailed)?,
            nonce: nonce.try_into().map_err(|_| Error::DecryptionFailed)?,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

/// Encrypt data with a password.
///
/// Draws a fresh salt and nonce for every call.
pub fn encrypt(plaintext: &[u8], password: &str, kdf: &KdfConfig) -> Result<EncryptedBlob> {
    let derivation = KeyDerivation::new(*kdf);
    let key = derivation.derive_key(password)?;
    let cipher = Cipher::new(&key);

    let mut nonce = [0u8; NONCE_LENGTH];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher.encrypt(&nonce, plaintext)?;

    Ok(EncryptedBlob {
        salt: *derivation.salt(),
        nonce,
        ciphertext,
    })
}

/// Decrypt data with a password.
pub fn decrypt(blob: &EncryptedBlob, password: &str, kdf: &KdfConfig) -> Result<Vec<u8>> {
    let key = KeyDerivation::from_salt(blob.salt, *kdf).derive_key(password)?;
    let cipher = Cipher::new(&key);

    cipher.decrypt(&blob.nonce, &blob.ciphertext)
}
