//! Token record layout, signing and validation.
//!
//! Wire format:
//!
//! ```text
//! <hash>.<signature>
//! hash      = encrypt_text(raw)
//! signature = base64url(HMAC-SHA256(hash, secret))
//! raw       = numsText TAB identity TAB payloadJSON
//! numsText  = encrypt_digits([authorized, account, expiry])
//! ```
//!
//! Validation authenticates before it decrypts: a token whose signature does
//! not check out is rejected before its ciphertext is touched.

use super::{now_unix, Token};
use crate::error::{Result, TokenError};
use crate::security::{mac, AesTokenCipher, TokenCipher};

/// Separator between the sealed record and its signature.
const TOKEN_SEP: char = '.';

/// Separator between record fields.
const FIELD_SEP: char = '\t';

/// Stored account integer for tokens that carry no account reference.
/// References that decode to it are refused at sign time.
const NO_ACCOUNT: i64 = i64::MIN;

/// Signs and validates tokens with a shared secret.
///
/// Holds no per-token state; one instance can serve any number of threads.
pub struct TokenCodec<C: TokenCipher = AesTokenCipher> {
    secret: Vec<u8>,
    cipher: C,
}

impl<C: TokenCipher> TokenCodec<C> {
    pub fn new(secret: impl Into<Vec<u8>>, cipher: C) -> Self {
        Self {
            secret: secret.into(),
            cipher,
        }
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Encode and sign `token`.
    ///
    /// Negative expiry is clamped to `0`. A payload that fails to serialize
    /// is dropped rather than failing the call; every other step is fatal.
    pub fn sign(&self, token: &Token) -> Result<String> {
        if token.identity.contains(FIELD_SEP) {
            return Err(TokenError::InvalidTokenFormat);
        }

        let expiry = token.expiry.max(0);

        let account = match token.account_id.as_deref() {
            Some(reference) => match self.cipher.decrypt_digit(reference) {
                Ok(NO_ACCOUNT) => return Err(TokenError::ReservedAccount),
                Ok(account) => account,
                Err(e) => {
                    tracing::debug!("Token sign: account reference did not decode: {e}");
                    return Err(e.into());
                }
            },
            None => NO_ACCOUNT,
        };

        let nums_text =
            self.cipher
                .encrypt_digits(&[i64::from(token.authorized), account, expiry])?;

        let payload = match &token.payload {
            Some(value) => serde_json::to_string(value).unwrap_or_else(|e| {
                tracing::warn!("Token sign: payload dropped, serialization failed: {e}");
                String::new()
            }),
            None => String::new(),
        };

        let raw = format!("{nums_text}{FIELD_SEP}{}{FIELD_SEP}{payload}", token.identity);
        let hash = self.cipher.encrypt_text(&raw)?;
        let signature = mac::sign(hash.as_bytes(), &self.secret)?;

        Ok(format!("{hash}{TOKEN_SEP}{signature}"))
    }

    /// Verify and decode `token` against the current clock.
    pub fn validate(&self, token: &str) -> Result<Token> {
        self.validate_at(token, now_unix())
    }

    /// Verify and decode `token`, judging expiry at Unix time `now`.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Token> {
        let mut segments = token.split(TOKEN_SEP);
        let (Some(hash), Some(signature), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::InvalidTokenFormat);
        };

        mac::verify(hash.as_bytes(), signature, &self.secret).map_err(|e| {
            tracing::debug!("Token validate: signature rejected");
            e
        })?;

        let raw = self.cipher.decrypt_text(hash)?;

        let mut fields = raw.split(FIELD_SEP);
        let (Some(nums_text), Some(identity), Some(payload), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(TokenError::InvalidTokenFormat);
        };

        let nums = self.cipher.decrypt_digits(nums_text)?;
        let [flag, account, expiry] = nums[..] else {
            return Err(TokenError::InvalidTokenFormat);
        };

        let mut decoded = Token {
            identity: identity.to_string(),
            account_id: None,
            authorized: false,
            expiry,
            payload: None,
        };
        decoded.authorized = flag > 0 && !decoded.is_expired_at(now);

        if !payload.is_empty() {
            decoded.payload = Some(serde_json::from_str(payload).map_err(TokenError::Payload)?);
        }

        if account != NO_ACCOUNT {
            match self.cipher.encrypt_digit(account) {
                Ok(reference) => decoded.account_id = Some(reference),
                Err(e) => tracing::debug!("Token validate: account left empty: {e}"),
            }
        }

        Ok(decoded)
    }
}
