use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Redis connection settings
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,

    /// Deadline applied to every command issued through the cache layer
    pub command_timeout_ms: u64,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_command_timeout(mut self, timeout_ms: u64) -> Self {
        self.command_timeout_ms = timeout_ms;
        self
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            command_timeout_ms: 5000,
        }
    }
}

/// Environment variables:
/// - `REDIS_URL` or `REDIS_HOST` (required)
/// - `REDIS_COMMAND_TIMEOUT_MS` (default: 5000)
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .map_err(|_| ConfigError::MissingEnvVar("REDIS_URL or REDIS_HOST".to_string()))?;

        Ok(Self {
            url,
            command_timeout_ms: env_parse("REDIS_COMMAND_TIMEOUT_MS", 5000u64)?,
        })
    }
}
