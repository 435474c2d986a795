#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

//! Stateless, tamper-evident authentication tokens for ZeroClaw.
//!
//! ```
//! use zeroclaw_token::{config::TokenConfig, DriverRegistry, Token};
//! use std::time::Duration;
//!
//! let conn = DriverRegistry::with_defaults()
//!     .connect(&TokenConfig::new("k1"))
//!     .unwrap();
//! let signed = conn
//!     .sign(&Token::new("dev-42").authorize(), Some(Duration::from_secs(3600)))
//!     .unwrap();
//! let token = conn.validate(&signed).unwrap();
//! assert!(token.authorized);
//! ```

pub mod config;
pub mod error;
pub mod security;
pub mod token;

pub use config::TokenConfig;
pub use error::{Result, TokenError};
pub use token::{DefaultDriver, DriverRegistry, Token, TokenCodec, TokenConnection, TokenDriver};
