//! Cryptographic primitives behind the token format.
//!
//! - [`mac`]: HMAC-SHA256 signing and constant-time verification
//! - [`encryption`]: AES-256-GCM sealing of the token record
//! - [`digits`]: keyed Feistel permutation for integers
//! - [`cipher`]: the [`TokenCipher`] seam and its default implementation

pub mod cipher;
pub mod digits;
pub mod encryption;
pub mod mac;

pub use cipher::{AesTokenCipher, CipherError, TokenCipher};
pub use encryption::AesEncryptor;
