//! Configuration management for the tracking-webhook relay service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use trackrelay_forward::ClientConfig;

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The three credentials (`ship24_bearer_token`, `appsheet_app_id`,
/// `appsheet_access_key`) have no usable defaults and must be provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
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
    /// Inbound HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Credentials
    /// Shared secret expected in the inbound `Authorization` header.
    ///
    /// Environment variable: `ship24_bearer_token`
    #[serde(default)]
    pub ship24_bearer_token: String,
    /// Application identifier in the data-store API path.
    ///
    /// Environment variable: `appsheet_app_id`
    #[serde(default)]
    pub appsheet_app_id: String,
    /// Access-key credential for the data-store API.
    ///
    /// Environment variable: `appsheet_access_key`
    #[serde(default)]
    pub appsheet_access_key: String,

    // Data-store endpoint
    /// Base URL of the data-store API.
    ///
    /// Environment variable: `appsheet_base_url`
    #[serde(default = "default_appsheet_base_url")]
    pub appsheet_base_url: String,
    /// Target table in the data-store API path.
    ///
    /// Environment variable: `appsheet_table`
    #[serde(default = "default_appsheet_table")]
    pub appsheet_table: String,
    /// HTTP request timeout for outbound row insertions in seconds.
    ///
    /// Environment variable: `FORWARD_TIMEOUT_SECONDS`
    #[serde(default = "default_forward_timeout", alias = "FORWARD_TIMEOUT_SECONDS")]
    pub forward_timeout_seconds: u64,

    // Logging
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
    /// Fails when a source cannot be read or validation rejects the merged
    /// configuration.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to the forward crate's client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.appsheet_base_url.clone(),
            app_id: self.appsheet_app_id.clone(),
            access_key: self.appsheet_access_key.clone(),
            table: self.appsheet_table.clone(),
            timeout: Duration::from_secs(self.forward_timeout_seconds),
            user_agent: "Trackrelay/1.0".to_string(),
        }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.ship24_bearer_token.is_empty() {
            anyhow::bail!("ship24_bearer_token must be set");
        }

        if self.appsheet_app_id.is_empty() {
            anyhow::bail!("appsheet_app_id must be set");
        }

        if self.appsheet_access_key.is_empty() {
            anyhow::bail!("appsheet_access_key must be set");
        }

        if self.appsheet_base_url.is_empty() {
            anyhow::bail!("appsheet_base_url must not be empty");
        }

        if self.forward_timeout_seconds == 0 {
            anyhow::bail!("forward_timeout_seconds must be greater than 0");
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
            ship24_bearer_token: String::new(),
            appsheet_app_id: String::new(),
            appsheet_access_key: String::new(),
            appsheet_base_url: default_appsheet_base_url(),
            appsheet_table: default_appsheet_table(),
            forward_timeout_seconds: default_forward_timeout(),
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

fn default_appsheet_base_url() -> String {
    "https://www.appsheet.com".to_string()
}

fn default_appsheet_table() -> String {
    "t0633".to_string()
}

fn default_forward_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
