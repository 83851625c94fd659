//! Startup configuration for remote access.
//!
//! The service base URL arrives as a CLI argument; the auth token is
//! supplied out of band through the `FERRY_TOKEN` environment variable.
//! Both are validated before any network activity.

use thiserror::Error;

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "FERRY_TOKEN";

/// Validated remote endpoint configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub token: String,
}

/// Startup validation errors. All of these fail the run before the first
/// remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("auth token not set; export FERRY_TOKEN before running")]
    MissingToken,

    #[error("service URL must start with http:// or https://, got '{url}'")]
    InvalidUrl { url: String },
}

impl Config {
    /// Build a configuration from explicit parts.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ConfigError> {
        let mut base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl { url: base_url });
        }
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self { base_url, token })
    }

    /// Build a configuration from the CLI-supplied URL and [`TOKEN_ENV`].
    pub fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        let token = std::env::var(TOKEN_ENV).unwrap_or_default();
        Self::new(base_url, token)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
