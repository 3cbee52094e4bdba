//! Key/value cache layer over a shared Redis `ConnectionManager`

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::cache::VariantCache;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CachedValue, Variant};

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    command_timeout: Duration,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager, command_timeout: Duration) -> Self {
        Self {
            conn,
            command_timeout,
        }
    }

    /// Run one command (or pipeline) under the command timeout
    async fn bounded<T, F>(&self, command: F) -> Result<T, String>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "command timed out after {}ms",
                self.command_timeout.as_millis()
            )),
        }
    }

    /// Read many keys in one `MGET` round trip
    ///
    /// Present values that do not parse as a variant come back as
    /// [`CachedValue::Degraded`].
    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    pub async fn get_batch(
        &self,
        keys: &[String],
    ) -> CatalogResult<HashMap<String, Option<CachedValue>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn.clone();
        let values: Vec<Option<Vec<u8>>> = self
            .bounded(redis::cmd("MGET").arg(keys).query_async(&mut conn))
            .await
            .map_err(CatalogError::CacheUnavailable)?;

        let mut found = HashMap::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            let cached = value.map(|raw| CachedValue::parse(&raw));
            if let Some(CachedValue::Degraded(_)) = &cached {
                warn!(key = %key, "Cached value is not a variant record; passing it through raw");
            }
            found.insert(key.clone(), cached);
        }

        debug!(
            hits = found.values().filter(|v| v.is_some()).count(),
            "Cache batch read"
        );
        Ok(found)
    }

    /// Write records as JSON in one pipelined batch of `SET key value EX ttl`
    #[instrument(skip(self, records, key_of), fields(records = records.len()))]
    pub async fn set_batch<T, K>(
        &self,
        records: &[T],
        key_of: K,
        ttl_seconds: u64,
    ) -> CatalogResult<()>
    where
        T: Serialize,
        K: Fn(&T) -> String,
    {
        if records.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for record in records {
            let payload = serde_json::to_string(record)
                .map_err(|e| CatalogError::CacheWrite(format!("Failed to encode record: {}", e)))?;
            pipe.set_ex(key_of(record), payload, ttl_seconds).ignore();
        }

        let mut conn = self.conn.clone();
        self.bounded(pipe.query_async::<()>(&mut conn))
            .await
            .map_err(CatalogError::CacheWrite)?;

        debug!("Cache batch written");
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> CatalogResult<bool> {
        let mut conn = self.conn.clone();
        self.bounded(conn.exists::<_, bool>(key))
            .await
            .map_err(CatalogError::CacheUnavailable)
    }
}

#[async_trait]
impl VariantCache for RedisCache {
    async fn batch_get(
        &self,
        keys: &[String],
    ) -> CatalogResult<HashMap<String, Option<CachedValue>>> {
        self.get_batch(keys).await
    }

    async fn batch_set(&self, records: &[Variant], ttl_seconds: u64) -> CatalogResult<()> {
        self.set_batch(records, Variant::cache_key, ttl_seconds).await
    }

    async fn exists(&self, key: &str) -> CatalogResult<bool> {
        RedisCache::exists(self, key).await
    }
}
