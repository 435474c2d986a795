use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use zeroclaw_token::security::{AesEncryptor, TokenCipher};
use zeroclaw_token::{DriverRegistry, Token, TokenConfig};

/// Sign and validate stateless ZeroClaw tokens.
#[derive(Parser, Debug)]
#[command(name = "zeroclaw-token", version, about)]
struct Cli {
    /// Config file (default: ~/.zeroclaw/token.toml, else environment only)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a fresh secret and cipher key as TOML
    Keygen,

    /// Print the public reference for a numeric account id
    Account { id: i64 },

    /// Sign a token and print it
    Sign {
        #[arg(long)]
        identity: String,

        /// Public account reference (see `account`)
        #[arg(long)]
        account: Option<String>,

        /// Lifetime in seconds
        #[arg(long)]
        ttl: Option<u64>,

        /// JSON payload
        #[arg(long)]
        payload: Option<String>,

        /// Store the authorized flag as false
        #[arg(long)]
        unauthorized: bool,
    },

    /// Validate a token and print it as JSON
    Validate { token: String },
}

fn load_config(path: Option<PathBuf>) -> Result<TokenConfig> {
    let path = path.or_else(|| TokenConfig::default_path().filter(|p| p.exists()));
    let Some(path) = path else {
        return TokenConfig::from_env();
    };

    let mut config = TokenConfig::load(&path)?;
    config.apply_env_overrides()?;
    tracing::debug!("Loaded token config from {}", path.display());
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => {
            println!("secret = \"{}\"", hex::encode(AesEncryptor::generate_key()));
            println!("cipher_key = \"{}\"", hex::encode(AesEncryptor::generate_key()));
        }
        Commands::Account { id } => {
            let config = load_config(cli.config)?;
            config.validate()?;
            println!("{}", config.cipher()?.encrypt_digit(id)?);
        }
        Commands::Sign {
            identity,
            account,
            ttl,
            payload,
            unauthorized,
        } => {
            let config = load_config(cli.config)?;
            let conn = DriverRegistry::with_defaults().connect(&config)?;

            let mut token = Token::new(identity);
            token.account_id = account;
            token.authorized = !unauthorized;
            if let Some(raw) = payload {
                token.payload =
                    Some(serde_json::from_str(&raw).context("--payload must be valid JSON")?);
            }

            println!("{}", conn.sign(&token, ttl.map(Duration::from_secs))?);
            conn.close()?;
        }
        Commands::Validate { token } => {
            let config = load_config(cli.config)?;
            let conn = DriverRegistry::with_defaults().connect(&config)?;
            let decoded = conn.validate(token.trim())?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
            conn.close()?;
        }
    }

    Ok(())
}
