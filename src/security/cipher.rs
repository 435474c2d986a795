//! Reversible encoding primitives consumed by the token codec.
//!
//! The codec never looks inside these encodings. It only relies on:
//! - every `encrypt_*` output being free of `.` and TAB
//! - every `decrypt_*` inverting its `encrypt_*` counterpart
//!
//! [`AesTokenCipher`] is the stock implementation: AES-256-GCM for text and
//! a keyed Feistel permutation for integers.

use super::digits::DigitPermutation;
use super::encryption::AesEncryptor;
use sha2::{Digest, Sha256};

/// Domain label mixed into the secret when no explicit cipher key is configured.
const DERIVED_KEY_LABEL: &[u8] = b"zeroclaw-token/cipher-key/v1";

const TEXT_SUBKEY_LABEL: &[u8] = b"zeroclaw-token/text/v1";
const DIGITS_SUBKEY_LABEL: &[u8] = b"zeroclaw-token/digits/v1";

/// SHA-256 over `label || key`.
fn derive_key(label: &[u8], key: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(label);
    hasher.update(key);
    hasher.finalize().into()
}

/// Failure inside one of the reversible encoding primitives.
///
/// Variants deliberately carry no input material: they end up in logs.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("encryption failed")]
    Encrypt,
    #[error("decryption failed")]
    Decrypt,
    #[error("malformed encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("unexpected length: {0} bytes")]
    Length(usize),
    #[error("invalid cipher key")]
    InvalidKey,
}

/// The text, integer-list and single-integer collaborators of the codec.
pub trait TokenCipher: Send + Sync {
    fn encrypt_text(&self, plaintext: &str) -> Result<String, CipherError>;

    fn decrypt_text(&self, encoded: &str) -> Result<String, CipherError>;

    fn encrypt_digits(&self, nums: &[i64]) -> Result<String, CipherError>;

    fn decrypt_digits(&self, encoded: &str) -> Result<Vec<i64>, CipherError>;

    fn encrypt_digit(&self, num: i64) -> Result<String, CipherError>;

    fn decrypt_digit(&self, encoded: &str) -> Result<i64, CipherError>;
}

/// Default [`TokenCipher`]: AES-256-GCM text plus Feistel-permuted integers.
pub struct AesTokenCipher {
    text: AesEncryptor,
    digits: DigitPermutation,
}

impl AesTokenCipher {
    /// Build from a 256-bit master key. AES and the integer permutation
    /// each get their own subkey.
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            text: AesEncryptor::new(derive_key(TEXT_SUBKEY_LABEL, &key)),
            digits: DigitPermutation::new(derive_key(DIGITS_SUBKEY_LABEL, &key)),
        }
    }

    /// Parse a 64-char hex key.
    pub fn from_hex(hex_key: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(hex_key.trim()).map_err(|_| CipherError::InvalidKey)?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| CipherError::InvalidKey)?;
        Ok(Self::new(key))
    }

    /// Derive the key from the MAC secret when no dedicated key exists.
    pub fn derive_from_secret(secret: &str) -> Self {
        Self::new(derive_key(DERIVED_KEY_LABEL, secret.as_bytes()))
    }
}

impl TokenCipher for AesTokenCipher {
    fn encrypt_text(&self, plaintext: &str) -> Result<String, CipherError> {
        self.text.encrypt(plaintext)
    }

    fn decrypt_text(&self, encoded: &str) -> Result<String, CipherError> {
        self.text.decrypt(encoded)
    }

    fn encrypt_digits(&self, nums: &[i64]) -> Result<String, CipherError> {
        Ok(self.digits.encode_many(nums))
    }

    fn decrypt_digits(&self, encoded: &str) -> Result<Vec<i64>, CipherError> {
        self.digits.decode_many(encoded)
    }

    fn encrypt_digit(&self, num: i64) -> Result<String, CipherError> {
        Ok(self.digits.encode(num))
    }

    fn decrypt_digit(&self, encoded: &str) -> Result<i64, CipherError> {
        self.digits.decode(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_roundtrip() {
        let cipher = AesTokenCipher::from_hex(&"ab".repeat(32)).unwrap();
        let encoded = cipher.encrypt_text("dev-42").unwrap();
        assert_eq!(cipher.decrypt_text(&encoded).unwrap(), "dev-42");
    }

    #[test]
    fn short_hex_key_rejected() {
        assert!(matches!(
            AesTokenCipher::from_hex("abcd"),
            Err(CipherError::InvalidKey)
        ));
        assert!(matches!(
            AesTokenCipher::from_hex("not hex at all"),
            Err(CipherError::InvalidKey)
        ));
    }

    #[test]
    fn derived_keys_depend_on_secret() {
        let a = AesTokenCipher::derive_from_secret("k1");
        let b = AesTokenCipher::derive_from_secret("k2");
        let a_again = AesTokenCipher::derive_from_secret("k1");

        assert_eq!(a.encrypt_digit(7).unwrap(), a_again.encrypt_digit(7).unwrap());
        assert_ne!(a.encrypt_digit(7).unwrap(), b.encrypt_digit(7).unwrap());

        let sealed = a.encrypt_text("hello").unwrap();
        assert!(b.decrypt_text(&sealed).is_err());
    }

    #[test]
    fn text_and_digit_subkeys_differ_from_master() {
        let master = [9u8; 32];
        let text_key = derive_key(TEXT_SUBKEY_LABEL, &master);
        let digits_key = derive_key(DIGITS_SUBKEY_LABEL, &master);
        assert_ne!(text_key, master);
        assert_ne!(digits_key, master);
        assert_ne!(text_key, digits_key);

        let cipher = AesTokenCipher::new(master);
        let sealed = cipher.encrypt_text("dev-42").unwrap();
        assert!(AesEncryptor::new(master).decrypt(&sealed).is_err());
        assert_eq!(AesEncryptor::new(text_key).decrypt(&sealed).unwrap(), "dev-42");
        assert_eq!(
            cipher.encrypt_digit(7).unwrap(),
            DigitPermutation::new(digits_key).encode(7)
        );
    }

    #[test]
    fn encodings_avoid_token_delimiters() {
        let cipher = AesTokenCipher::derive_from_secret("k1");
        let outputs = [
            cipher.encrypt_text("a\tb\tc").unwrap(),
            cipher.encrypt_digits(&[1, -1, i64::MAX]).unwrap(),
            cipher.encrypt_digit(i64::MIN).unwrap(),
        ];
        for out in outputs {
            assert!(!out.contains('.'));
            assert!(!out.contains('\t'));
        }
    }
}
