//! Configuration management for the hooksink webhook gateway.

use std::{net::SocketAddr, str::FromStr};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The verification token and registration secret are configuration, never
/// literals in handler code. Defaults exist so the gateway works
/// out-of-the-box for local experiments; override both for anything shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,

    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,

    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Path of the SQLite database file backing the event store.
    ///
    /// Environment variable: `DATABASE_PATH`
    #[serde(default = "default_database_path", alias = "DATABASE_PATH")]
    pub database_path: String,

    /// Expected `hub.verify_token` for subscription-verification handshakes.
    ///
    /// Environment variable: `VERIFY_TOKEN`
    #[serde(default = "default_verify_token", alias = "VERIFY_TOKEN")]
    pub verify_token: String,

    /// Shared secret for `/register`, compared case-insensitively.
    ///
    /// Environment variable: `REGISTER_SECRET`
    #[serde(default = "default_register_secret", alias = "REGISTER_SECRET")]
    pub register_secret: String,

    /// URL scheme used when constructing callback and history URLs.
    ///
    /// The gateway is expected to sit behind TLS termination, so this
    /// defaults to `https` regardless of the local listener.
    ///
    /// Environment variable: `PUBLIC_SCHEME`
    #[serde(default = "default_public_scheme", alias = "PUBLIC_SCHEME")]
    pub public_scheme: String,

    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction fails or validation rejects a value.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse server socket address from host and port configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid socket address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.verify_token.is_empty() {
            anyhow::bail!("verify_token must not be empty");
        }

        if self.register_secret.is_empty() {
            anyhow::bail!("register_secret must not be empty");
        }

        if self.database_path.is_empty() {
            anyhow::bail!("database_path must not be empty");
        }

        if !matches!(self.public_scheme.as_str(), "http" | "https") {
            anyhow::bail!("public_scheme must be http or https");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            database_path: default_database_path(),
            verify_token: default_verify_token(),
            register_secret: default_register_secret(),
            public_scheme: default_public_scheme(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_database_path() -> String {
    "hooksink.db".to_string()
}

fn default_verify_token() -> String {
    "TEST_VERIFY_TOKEN".to_string()
}

fn default_register_secret() -> String {
    "superdupersecret".to_string()
}

fn default_public_scheme() -> String {
    "https".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
