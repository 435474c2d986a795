//! Host-facing token drivers.
//!
//! A [`TokenDriver`] turns a [`TokenConfig`] into a [`TokenConnection`]; the
//! [`DriverRegistry`] maps driver names to drivers. Registration is explicit:
//! build a registry, register what you need, then connect by name.

use super::{expiry_after, Token, TokenCodec};
use crate::config::TokenConfig;
use crate::error::{Result, TokenError};
use crate::security::AesTokenCipher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Name the stock driver registers under.
pub const DEFAULT_DRIVER: &str = "default";

/// A configured token signer/validator.
pub trait TokenConnection: Send + Sync {
    fn open(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Sign `token`. `Some(ttl)` replaces its expiry with `now + ttl`.
    fn sign(&self, token: &Token, ttl: Option<Duration>) -> Result<String>;

    fn validate(&self, token: &str) -> Result<Token>;
}

/// Factory for connections of one kind.
pub trait TokenDriver: Send + Sync {
    fn connect(&self, config: &TokenConfig) -> anyhow::Result<Box<dyn TokenConnection>>;
}

/// Stateless HMAC + AES driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDriver;

impl TokenDriver for DefaultDriver {
    fn connect(&self, config: &TokenConfig) -> anyhow::Result<Box<dyn TokenConnection>> {
        config.validate()?;
        Ok(Box::new(DefaultConnection {
            codec: TokenCodec::new(config.secret.as_bytes(), config.cipher()?),
            default_ttl: config.default_ttl_secs.map(Duration::from_secs),
        }))
    }
}

pub struct DefaultConnection {
    codec: TokenCodec<AesTokenCipher>,
    default_ttl: Option<Duration>,
}

impl TokenConnection for DefaultConnection {
    fn open(&self) -> Result<()> {
        tracing::debug!("Token connection opened");
        Ok(())
    }

    fn close(&self) -> Result<()> {
        tracing::debug!("Token connection closed");
        Ok(())
    }

    fn sign(&self, token: &Token, ttl: Option<Duration>) -> Result<String> {
        let ttl = ttl.or(self.default_ttl.filter(|_| token.expiry <= 0));
        match ttl {
            Some(ttl) => {
                let mut token = token.clone();
                token.expiry = expiry_after(ttl);
                self.codec.sign(&token)
            }
            None => self.codec.sign(token),
        }
    }

    fn validate(&self, token: &str) -> Result<Token> {
        self.codec.validate(token)
    }
}

/// Named token drivers.
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn TokenDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with [`DefaultDriver`] under [`DEFAULT_DRIVER`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_DRIVER, DefaultDriver);
        registry
    }

    /// Add or replace a driver. Returns the previous one, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        driver: impl TokenDriver + 'static,
    ) -> Option<Arc<dyn TokenDriver>> {
        let name = name.into();
        let previous = self.drivers.insert(name.clone(), Arc::new(driver));
        if previous.is_some() {
            tracing::warn!("Token driver '{name}' replaced");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TokenDriver>> {
        self.drivers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Connect with the driver named by `config.driver` and open it.
    pub fn connect(&self, config: &TokenConfig) -> anyhow::Result<Box<dyn TokenConnection>> {
        let driver = self
            .get(&config.driver)
            .ok_or_else(|| TokenError::UnknownDriver(config.driver.clone()))?;
        let connection = driver.connect(config)?;
        connection.open()?;
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::now_unix;

    fn connection(config: &TokenConfig) -> Box<dyn TokenConnection> {
        DriverRegistry::with_defaults().connect(config).unwrap()
    }

    #[test]
    fn default_driver_registered() {
        let registry = DriverRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["default".to_string()]);
        assert!(registry.get("default").is_some());
        assert!(registry.get("jwt").is_none());
    }

    #[test]
    fn unknown_driver_rejected() {
        let mut config = TokenConfig::new("k1");
        config.driver = "jwt".into();
        let err = DriverRegistry::with_defaults()
            .connect(&config)
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<TokenError>(),
            Some(TokenError::UnknownDriver(name)) if name == "jwt"
        ));
    }

    #[test]
    fn empty_secret_refused_at_connect() {
        assert!(DefaultDriver.connect(&TokenConfig::new("")).is_err());
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = DriverRegistry::new();
        assert!(registry.register("a", DefaultDriver).is_none());
        assert!(registry.register("a", DefaultDriver).is_some());
        registry.register("b", DefaultDriver);
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn connection_roundtrip_with_explicit_ttl() {
        let conn = connection(&TokenConfig::new("k1"));
        let before = now_unix();

        let signed = conn
            .sign(&Token::new("dev-42").authorize(), Some(Duration::from_secs(3600)))
            .unwrap();
        let decoded = conn.validate(&signed).unwrap();

        assert!(decoded.authorized);
        assert!(decoded.expiry >= before + 3600);
        conn.close().unwrap();
    }

    #[test]
    fn default_ttl_applies_only_to_unbounded_tokens() {
        let mut config = TokenConfig::new("k1");
        config.default_ttl_secs = Some(60);
        let conn = connection(&config);
        let before = now_unix();

        let unbounded = conn.validate(&conn.sign(&Token::new("a"), None).unwrap()).unwrap();
        assert!(unbounded.expiry >= before + 60);

        let fixed = conn
            .validate(&conn.sign(&Token::new("b").with_expiry(42), None).unwrap())
            .unwrap();
        assert_eq!(fixed.expiry, 42);

        let negative = conn
            .validate(&conn.sign(&Token::new("c").with_expiry(-5), None).unwrap())
            .unwrap();
        assert!(negative.expiry >= before + 60);
    }

    #[test]
    fn no_ttl_keeps_token_expiry() {
        let conn = connection(&TokenConfig::new("k1"));
        let decoded = conn.validate(&conn.sign(&Token::new("a"), None).unwrap()).unwrap();
        assert_eq!(decoded.expiry, 0);
    }

    #[test]
    fn connections_share_secret_not_state() {
        let config = TokenConfig::new("k1");
        let a = connection(&config);
        let b = connection(&config);
        let signed = a.sign(&Token::new("dev-42"), None).unwrap();
        assert_eq!(b.validate(&signed).unwrap().identity, "dev-42");

        let other = connection(&TokenConfig::new("k2"));
        assert!(other.validate(&signed).is_err());
    }
}
