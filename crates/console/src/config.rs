//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PLATEFUL_API_URL` - Base URL of the platform API. Presence selects
//!   remote mode; absence selects local demo mode.
//! - `PLATEFUL_API_TOKEN` - Bearer token for the platform API
//! - `PLATEFUL_API_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `PLATEFUL_DATA_DIR` - Directory for on-device demo data
//!   (default: `.plateful`)
//!
//! The operating mode is decided once at load time and never changes for the
//! lifetime of the process; every store consults it through
//! [`ConsoleConfig::mode`].

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DATA_DIR: &str = ".plateful";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend the stores operate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mutations call the platform API and merge confirmed entities.
    Remote,
    /// Mutations apply to seeded fixture data persisted on-device.
    Local,
}

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the platform API (no trailing slash).
    pub base_url: Url,
    /// Bearer token, if the API requires one.
    pub api_token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Operating mode, fixed at startup.
    pub mode: Mode,
    /// Remote API settings; present iff `mode` is [`Mode::Remote`].
    pub remote: Option<RemoteConfig>,
    /// Directory holding local demo data.
    pub data_dir: PathBuf,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `PLATEFUL_API_URL` is not a
    /// valid URL or the timeout is not an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var("PLATEFUL_DATA_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let Ok(api_url) = std::env::var("PLATEFUL_API_URL") else {
            return Ok(Self {
                mode: Mode::Local,
                remote: None,
                data_dir,
            });
        };

        let base_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("PLATEFUL_API_URL".to_string(), e.to_string()))?;

        let timeout_secs = match std::env::var("PLATEFUL_API_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("PLATEFUL_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let api_token = std::env::var("PLATEFUL_API_TOKEN").ok().map(SecretString::from);

        Ok(Self {
            mode: Mode::Remote,
            remote: Some(RemoteConfig {
                base_url,
                api_token,
                timeout: Duration::from_secs(timeout_secs),
            }),
            data_dir,
        })
    }

    /// A local-mode configuration rooted at `data_dir`, used by tests and the
    /// CLI's demo commands.
    #[must_use]
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Local,
            remote: None,
            data_dir: data_dir.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_has_no_remote() {
        let config = ConsoleConfig::local("/tmp/plateful-test");
        assert_eq!(config.mode, Mode::Local);
        assert!(config.remote.is_none());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/plateful-test"));
    }
}
