// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Symmetric encryption for refresh tokens in transit.
//!
//! The plaintext refresh secret is stored server-side; only the encrypted
//! form ever reaches the client. The configured secret string is hashed with
//! SHA-256 to derive a 32-byte key, so secrets of any length work.
//!
//! Wire format: `base64(nonce (12 bytes) || ciphertext)`. AES-256-GCM is
//! authenticated, so a tampered or truncated value fails decryption instead
//! of producing garbage plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("ciphertext is not valid base64")]
    InvalidEncoding,

    #[error("ciphertext is too short to contain a nonce")]
    Truncated,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decrypted value is not valid UTF-8")]
    InvalidPlaintext,
}

/// AES-256-GCM cipher keyed from a configured secret string.
pub struct Cipher {
    cipher: Aes256Gcm,
}

impl Cipher {
    /// Derive a cipher from an arbitrary-length secret.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt a plaintext secret for delivery to the client.
    ///
    /// A fresh random nonce is generated per call, so encrypting the same
    /// plaintext twice yields different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(Base64::encode_string(&combined))
    }

    /// Decrypt an inbound value back to the plaintext secret.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let combined = Base64::decode_vec(encoded).map_err(|_| CipherError::InvalidEncoding)?;
        if combined.len() <= NONCE_LEN {
            return Err(CipherError::Truncated);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidPlaintext)
    }
}
