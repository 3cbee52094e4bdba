use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use super::RedisConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Open a `ConnectionManager` and verify it with `PING`
///
/// The manager reconnects on its own after the initial handshake, so one
/// instance is shared (cloned) across the whole process.
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Connected to Redis");
    Ok(manager)
}

pub async fn connect_from_config(config: &RedisConfig) -> redis::RedisResult<ConnectionManager> {
    connect(&config.url).await
}

/// Connect, retrying with exponential backoff while the server is unreachable
pub async fn connect_from_config_with_retry(
    config: &RedisConfig,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    let attempt = || connect(&config.url);

    match retry_config {
        Some(retry_config) => retry_with_backoff(attempt, retry_config).await,
        None => retry(attempt).await,
    }
}
