//! Redis test infrastructure

use redis::Client;
use redis::aio::ConnectionManager;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Redis container plus a `ConnectionManager` connected to it
///
/// The container is stopped and removed when this struct is dropped.
pub struct TestRedis {
    #[allow(dead_code)]
    container: ContainerAsync<Redis>,
    manager: ConnectionManager,
    pub connection_string: String,
}

impl TestRedis {
    pub async fn new() -> Self {
        let container = Redis::default()
            .with_tag("8-alpine")
            .start()
            .await
            .expect("Failed to start Redis container");

        let host_port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let connection_string = format!("redis://127.0.0.1:{}", host_port);

        let client = Client::open(connection_string.clone()).expect("Failed to create Redis client");
        let manager = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!(port = host_port, "Test Redis ready");

        Self {
            container,
            manager,
            connection_string,
        }
    }

    /// A clone of the shared manager, as the cache layer expects
    pub fn connection_manager(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::AsyncCommands;

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_redis_expiry() {
        let redis = TestRedis::new().await;
        let mut conn = redis.connection_manager();

        conn.set_ex::<_, _, ()>("expiring_key", "value", 1)
            .await
            .unwrap();
        let exists: bool = conn.exists("expiring_key").await.unwrap();
        assert!(exists);

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        let exists: bool = conn.exists("expiring_key").await.unwrap();
        assert!(!exists);
    }
}
