use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::CatalogResult;
use crate::models::{CachedValue, Variant};

/// Cache port consumed by the hydration pipeline
///
/// `batch_get` returns an entry for every requested key: `None` for a miss,
/// `Some` for a present value (parsed or degraded).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VariantCache: Send + Sync {
    async fn batch_get(
        &self,
        keys: &[String],
    ) -> CatalogResult<HashMap<String, Option<CachedValue>>>;

    /// Write every record under [`Variant::cache_key`] with the same TTL
    async fn batch_set(&self, records: &[Variant], ttl_seconds: u64) -> CatalogResult<()>;

    async fn exists(&self, key: &str) -> CatalogResult<bool>;
}
