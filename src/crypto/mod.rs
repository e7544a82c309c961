//! Cryptographic operations for hidden payloads.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption
//! - PBKDF2-HMAC-SHA256 (default) or Argon2id password-based key derivation

mod cipher;
mod kdf;

pub use cipher::{decrypt, encrypt, Cipher, EncryptedBlob};
pub use kdf::{derive_key, DerivedKey, KeyDerivation};
