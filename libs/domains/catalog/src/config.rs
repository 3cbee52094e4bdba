use core_config::{ConfigError, FromEnv, env_parse, env_required, env_or_default};
use std::time::Duration;

/// Search index connection settings
#[derive(Clone, Debug)]
pub struct ElasticsearchConfig {
    pub url: String,
    pub index: String,
    /// Request-level timeout on the HTTP client
    pub timeout_secs: u64,
}

impl ElasticsearchConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index: "product_variants".to_string(),
            timeout_secs: 10,
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Environment variables:
/// - `ELASTICSEARCH_URL` (required)
/// - `ELASTICSEARCH_INDEX` (default: product_variants)
/// - `ELASTICSEARCH_TIMEOUT_SECS` (default: 10)
impl FromEnv for ElasticsearchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("ELASTICSEARCH_URL")?,
            index: env_or_default("ELASTICSEARCH_INDEX", "product_variants"),
            timeout_secs: env_parse("ELASTICSEARCH_TIMEOUT_SECS", 10u64)?,
        })
    }
}

/// Hydration pipeline settings
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// TTL of every cache write-back
    pub cache_ttl_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 60,
        }
    }
}

/// Environment variables:
/// - `CACHE_TTL_SECONDS` (default: 60, must be positive)
impl FromEnv for CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let cache_ttl_seconds = env_parse("CACHE_TTL_SECONDS", 60u64)?;
        if cache_ttl_seconds == 0 {
            return Err(ConfigError::ParseError {
                key: "CACHE_TTL_SECONDS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self { cache_ttl_seconds })
    }
}
