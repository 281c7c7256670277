use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable holding the password when `password_env` is not set
pub const DEFAULT_PASSWORD_ENV: &str = "DB_PASSWORD";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error occurred while reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error occurred
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A setting is present but unusable
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending setting
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Database connection configuration
    pub database: DatabaseConfig,
    /// Retry settings for the connector
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Database connection configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,
    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database user
    pub user: String,
    /// Environment variable containing the password
    pub password_env: Option<String>,
    /// Database name
    pub dbname: String,
}

/// Retry settings as they appear in the config file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of connection attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seconds to wait between attempts
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Wait once more after the final failed attempt
    #[serde(default)]
    pub sleep_after_final_attempt: bool,
}

const fn default_port() -> u16 {
    5432
}

const fn default_max_attempts() -> u32 {
    crate::retry::DEFAULT_MAX_ATTEMPTS
}

const fn default_delay_secs() -> u64 {
    crate::retry::DEFAULT_DELAY.as_secs()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: default_port(),
            user: "postgres".to_string(),
            password_env: Some(DEFAULT_PASSWORD_ENV.to_string()),
            dbname: "postgres".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
            sleep_after_final_attempt: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.database.apply_env_overrides()?;
        Ok(config)
    }

    /// Load the optional file, then apply environment overrides
    ///
    /// Call [`Config::validate`] once every override is in place.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.as_ref().display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.database.apply_env_overrides()?;
        Ok(config)
    }

    /// Reject settings the connector cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.host",
                message: "must not be empty".to_string(),
            });
        }
        if self.database.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.port",
                message: "must be between 1 and 65535".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Override fields from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_NAME` and `DB_PASSWORD_ENV`
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("DB_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("DB_PORT") {
            self.port = port.parse().map_err(|e| ConfigError::InvalidValue {
                field: "DB_PORT",
                message: format!("{port:?}: {e}"),
            })?;
        }
        if let Ok(user) = env::var("DB_USER") {
            self.user = user;
        }
        if let Ok(dbname) = env::var("DB_NAME") {
            self.dbname = dbname;
        }
        if let Ok(password_env) = env::var("DB_PASSWORD_ENV") {
            self.password_env = Some(password_env);
        }
        Ok(())
    }

    /// Resolve the password from the configured environment variable
    ///
    /// A missing variable yields an empty password and a warning.
    #[must_use]
    pub fn password(&self) -> String {
        self.password_env
            .as_ref()
            .map_or_else(String::new, |password_env| {
                env::var(password_env).unwrap_or_else(|_| {
                    warn!(
                        "Environment variable {} not found, using empty password",
                        password_env
                    );
                    String::new()
                })
            })
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new()
            .with_max_attempts(config.max_attempts)
            .with_delay(Duration::from_secs(config.delay_secs))
            .with_sleep_after_final_attempt(config.sleep_after_final_attempt)
    }
}
