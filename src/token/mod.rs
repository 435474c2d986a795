//! Stateless, tamper-evident authentication tokens.
//!
//! A token is `<hash>.<signature>` where `hash` is the encrypted record
//! `numsText TAB identity TAB payloadJSON` and `signature` is an HMAC over
//! `hash`. Nothing is stored server-side: everything needed to validate a
//! token is the secret and the cipher key.
//!
//! ## Layers
//! - [`codec`]: record layout, sign/validate, expiry policy
//! - [`driver`]: host-facing connection objects and an explicit registry

pub mod codec;
pub mod driver;

pub use codec::TokenCodec;
pub use driver::{DefaultDriver, DriverRegistry, TokenConnection, TokenDriver};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current Unix time in seconds.
pub(crate) fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// The identity + authorization record carried by a token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Routable subject identifier (session id, device id, ...). No TABs.
    pub identity: String,
    /// Public, obfuscated account reference. See [`crate::security::TokenCipher::encrypt_digit`].
    pub account_id: Option<String>,
    /// On a decoded token: stored flag AND not yet expired.
    pub authorized: bool,
    /// Unix seconds. Values `<= 0` mean no bound is set; validation still
    /// requires `now < expiry`, so such tokens decode unauthorized.
    pub expiry: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Token {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: i64) -> Self {
        self.expiry = expiry;
        self
    }

    /// Expire `ttl` from now.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expiry = expiry_after(ttl);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn authorize(mut self) -> Self {
        self.authorized = true;
        self
    }

    /// Whether `now` is at or past `expiry`. This is the rule validation
    /// applies, so a token with expiry `0` counts as expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expiry
    }
}

pub(crate) fn expiry_after(ttl: Duration) -> i64 {
    let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    now_unix().saturating_add(secs)
}
