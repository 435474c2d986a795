//! AES-256-GCM text sealing for the token record.
//!
//! Output is URL-safe base64 (no padding) of `nonce || ciphertext`, so it can
//! sit in front of the `.` separator without escaping.

use super::cipher::CipherError;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Nonce size for AES-256-GCM (12 bytes / 96 bits).
const AES_GCM_NONCE_SIZE: usize = 12;

/// AES-256-GCM encryption engine.
pub struct AesEncryptor {
    key: [u8; 32],
}

impl AesEncryptor {
    /// Create a new encryptor with a 256-bit key.
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Fresh random 256-bit key from the OS RNG.
    pub fn generate_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        key
    }

    fn cipher(&self) -> Result<Aes256Gcm, CipherError> {
        Aes256Gcm::new_from_slice(&self.key).map_err(|_| CipherError::InvalidKey)
    }

    /// Encrypt plaintext under a random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut combined = Vec::with_capacity(AES_GCM_NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(&combined))
    }

    /// Decrypt a value produced by [`AesEncryptor::encrypt`].
    pub fn decrypt(&self, encrypted: &str) -> Result<String, CipherError> {
        let combined = URL_SAFE_NO_PAD.decode(encrypted)?;

        if combined.len() < AES_GCM_NONCE_SIZE {
            return Err(CipherError::Length(combined.len()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(AES_GCM_NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher()?
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decrypt)
    }
}
