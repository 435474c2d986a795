//! Error type shared by the MAC engine, token codec and drivers.

use crate::security::CipherError;

pub type Result<T> = std::result::Result<T, TokenError>;

/// Token signing / validation failure.
///
/// Messages never include the secret, the decrypted record or the payload.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// MAC primitive unusable, or the signature is malformed or wrong.
    #[error("hash unavailable")]
    HashUnavailable,

    /// Segment counts are off at one of the split points.
    #[error("invalid token data")]
    InvalidTokenFormat,

    #[error("token cipher: {0}")]
    Cipher(#[from] CipherError),

    /// Payload JSON did not parse. The message never quotes the input.
    #[error("token payload is not valid JSON")]
    Payload(#[source] serde_json::Error),

    /// Account reference decodes to the integer reserved for "no account".
    #[error("account reference is reserved")]
    ReservedAccount,

    #[error("unknown token driver: {0}")]
    UnknownDriver(String),
}
