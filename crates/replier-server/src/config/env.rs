// crates/replier-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use tracing::{debug, info, warn};

use crate::error::{ReplierError, Result};

pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const PORT_VAR: &str = "PORT";
pub const HOST_VAR: &str = "REPLIER_HOST";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Server configuration
#[derive(Clone)]
pub struct Config {
    /// Anthropic API key (ANTHROPIC_API_KEY, required)
    pub anthropic_api_key: String,
    /// Anthropic API base URL (ANTHROPIC_BASE_URL)
    pub anthropic_base_url: String,
    /// Bind address (REPLIER_HOST)
    pub host: String,
    /// Listen port (PORT)
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("anthropic_api_key", &"<redacted>")
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let anthropic_api_key = read(ANTHROPIC_API_KEY_VAR).ok_or_else(|| {
            ReplierError::Config(format!(
                "{} environment variable is required",
                ANTHROPIC_API_KEY_VAR
            ))
        })?;

        let port = match read(PORT_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let host = read(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let anthropic_base_url = read(ANTHROPIC_BASE_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if anthropic_base_url != DEFAULT_BASE_URL {
            debug!(base_url = %anthropic_base_url, "Using custom Anthropic base URL");
        }
        info!("Anthropic API key loaded");

        Ok(Self {
            anthropic_api_key,
            anthropic_base_url,
            host,
            port,
        })
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
