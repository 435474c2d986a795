//! Token service configuration.
//!
//! Loaded from `~/.zeroclaw/token.toml` (or an explicit path), then
//! overridden by `ZEROCLAW_TOKEN_*` environment variables.
//!
//! ```toml
//! secret = "change-me"
//! cipher_key = "<64 hex chars>"   # optional, derived from secret if absent
//! default_ttl_secs = 86400        # optional
//! driver = "default"
//! ```

use crate::security::AesTokenCipher;
use crate::token::driver::DEFAULT_DRIVER;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_SECRET: &str = "ZEROCLAW_TOKEN_SECRET";
pub const ENV_CIPHER_KEY: &str = "ZEROCLAW_TOKEN_CIPHER_KEY";
pub const ENV_TTL: &str = "ZEROCLAW_TOKEN_TTL";

fn default_driver() -> String {
    DEFAULT_DRIVER.into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC key for token signatures.
    pub secret: String,
    /// Hex-encoded 256-bit key for the record cipher.
    #[serde(default)]
    pub cipher_key: Option<String>,
    /// Lifetime applied to tokens signed without an expiry.
    #[serde(default)]
    pub default_ttl_secs: Option<u64>,
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cipher_key: None,
            default_ttl_secs: None,
            driver: default_driver(),
        }
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }

    /// `~/.zeroclaw/token.toml`, if a home directory can be resolved.
    pub fn default_path() -> Option<PathBuf> {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".zeroclaw").join("token.toml"))
    }

    /// Parse a TOML file. `~` and `$VARS` in the path are expanded.
    pub fn load(path: &Path) -> Result<Self> {
        let raw_path = path.to_string_lossy();
        let expanded = shellexpand::full(&raw_path)
            .with_context(|| format!("Failed to expand config path {raw_path}"))?;
        let path = PathBuf::from(expanded.as_ref());

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read token config {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid token config {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Build purely from the environment. Requires `ZEROCLAW_TOKEN_SECRET`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        if config.secret.is_empty() {
            bail!("{ENV_SECRET} is not set");
        }
        Ok(config)
    }

    /// Overlay any `ZEROCLAW_TOKEN_*` variables that are set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(secret) = lookup(ENV_SECRET).filter(|s| !s.is_empty()) {
            self.secret = secret;
        }
        if let Some(key) = lookup(ENV_CIPHER_KEY).filter(|s| !s.is_empty()) {
            self.cipher_key = Some(key);
        }
        if let Some(ttl) = lookup(ENV_TTL).filter(|s| !s.is_empty()) {
            let ttl = ttl
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_TTL} must be a whole number of seconds"))?;
            self.default_ttl_secs = Some(ttl);
        }
        Ok(())
    }

    /// Reject configs the codec cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            bail!("Token secret must not be empty");
        }
        if self.driver.trim().is_empty() {
            bail!("Token driver name must not be empty");
        }
        self.cipher()?;
        Ok(())
    }

    /// Cipher for the token record, from `cipher_key` or derived from `secret`.
    pub fn cipher(&self) -> Result<AesTokenCipher> {
        match self.cipher_key.as_deref() {
            Some(key) => AesTokenCipher::from_hex(key)
                .context("cipher_key must be 64 hex characters (32 bytes)"),
            None => Ok(AesTokenCipher::derive_from_secret(&self.secret)),
        }
    }
}
