//! Keyed message authentication for token signatures.
//!
//! The algorithm is fixed to HMAC-SHA256. Signatures travel as URL-safe
//! base64 **with** padding.

use crate::error::TokenError;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8]) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(key).map_err(|_| TokenError::HashUnavailable)
}

/// Sign `data` with `key`, returning the encoded MAC.
pub fn sign(data: &[u8], key: &[u8]) -> Result<String, TokenError> {
    let mut mac = keyed(key)?;
    mac.update(data);
    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Check `signature` against `data` in constant time.
///
/// Malformed base64 and a wrong code are reported as the same
/// [`TokenError::HashUnavailable`] so callers cannot tell them apart.
pub fn verify(data: &[u8], signature: &str, key: &[u8]) -> Result<(), TokenError> {
    let expected = URL_SAFE
        .decode(signature)
        .map_err(|_| TokenError::HashUnavailable)?;

    let mut mac = keyed(key)?;
    mac.update(data);
    mac.verify_slice(&expected)
        .map_err(|_| TokenError::HashUnavailable)
}
