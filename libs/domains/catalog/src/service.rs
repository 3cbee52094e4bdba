use observability::HydrationMetrics;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::cache::VariantCache;
use crate::error::{CatalogError, CatalogResult};
use crate::index::{IndexQuery, SearchIndex};
use crate::models::{
    Advisory, CachedValue, HydratedVariant, SearchOutcome, SearchRequest, SearchResponse, Variant,
};
use crate::repository::VariantRepository;

/// Search-result hydration pipeline
///
/// Ranked ids come from the index, records from the cache when present and
/// from the store otherwise. Store results are written back to the cache.
/// The index's rank order is preserved end to end.
pub struct CatalogSearchService<I, C, R> {
    index: Arc<I>,
    cache: Arc<C>,
    repository: Arc<R>,
    cache_ttl_seconds: u64,
}

impl<I, C, R> Clone for CatalogSearchService<I, C, R> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            cache: Arc::clone(&self.cache),
            repository: Arc::clone(&self.repository),
            cache_ttl_seconds: self.cache_ttl_seconds,
        }
    }
}

impl<I, C, R> CatalogSearchService<I, C, R>
where
    I: SearchIndex,
    C: VariantCache,
    R: VariantRepository,
{
    pub fn new(index: Arc<I>, cache: Arc<C>, repository: Arc<R>, cache_ttl_seconds: u64) -> Self {
        Self {
            index,
            cache,
            repository,
            cache_ttl_seconds,
        }
    }

    /// Search the index and hydrate the ranked page
    ///
    /// Cache failures never fail the search; they are returned as advisories.
    #[instrument(
        skip(self, request),
        fields(query = ?request.query, skip = request.skip, limit = request.limit)
    )]
    pub async fn search(&self, request: SearchRequest) -> CatalogResult<SearchOutcome> {
        let started = Instant::now();
        let result = self.run(request).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(CatalogError::Validation(_)) => "rejected",
            Err(_) => "failed",
        };
        HydrationMetrics::record_search(outcome, started.elapsed().as_secs_f64());

        result
    }

    async fn run(&self, request: SearchRequest) -> CatalogResult<SearchOutcome> {
        request.validate()?;

        // Validated: skip >= 0, limit >= 1
        let page = self
            .index
            .search(IndexQuery {
                text: request.normalized_query(),
                filters: request.filter,
                skip: request.skip as u64,
                limit: request.limit as u64,
                fields: Some(vec!["id".to_string()]),
            })
            .await?;
        debug!(total = page.total, returned = page.ids.len(), "Index returned ranked ids");

        let mut advisories = Vec::new();
        let products = self.hydrate(&page.ids, &mut advisories).await?;

        Ok(SearchOutcome {
            response: SearchResponse {
                total: page.total,
                products,
                skip: page.skip,
                limit: page.limit,
            },
            advisories,
        })
    }

    async fn hydrate(
        &self,
        ids: &[Uuid],
        advisories: &mut Vec<Advisory>,
    ) -> CatalogResult<Vec<HydratedVariant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let cached = match self.cache.batch_get(&keys).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Cache read failed; hydrating every id from the store");
                HydrationMetrics::record_cache_read_failure();
                advisories.push(Advisory::CacheReadUnavailable {
                    reason: e.to_string(),
                });
                HashMap::new()
            }
        };

        let mut hits = 0;
        let mut miss_ids = Vec::new();
        let mut seen = HashSet::new();
        for (id, key) in ids.iter().zip(&keys) {
            let first_sighting = seen.insert(*id);
            match cached.get(key) {
                Some(Some(value)) => {
                    hits += 1;
                    if first_sighting && matches!(value, CachedValue::Degraded(_)) {
                        HydrationMetrics::record_cache_degraded();
                        advisories.push(Advisory::CacheReadDegraded { key: key.clone() });
                    }
                }
                _ if first_sighting => miss_ids.push(*id),
                _ => {}
            }
        }
        let misses = ids.len() - hits;
        HydrationMetrics::record_cache_lookup(hits, misses);
        debug!(hits, misses, "Partitioned ranked ids");

        let fetched = if miss_ids.is_empty() {
            HashMap::new()
        } else {
            let records = self.repository.fetch_by_ids(&miss_ids).await?;
            let dropped = miss_ids.len().saturating_sub(records.len());
            if dropped > 0 {
                debug!(dropped, "Store has no row for some indexed ids");
            }
            HydrationMetrics::record_store_dropped(dropped);

            self.write_back(&records, advisories).await;
            records
                .into_iter()
                .map(|variant| (variant.id, variant))
                .collect::<HashMap<Uuid, Variant>>()
        };

        let products = ids
            .iter()
            .zip(&keys)
            .filter_map(|(id, key)| match cached.get(key) {
                Some(Some(value)) => Some(HydratedVariant::from(value.clone())),
                _ => fetched.get(id).cloned().map(HydratedVariant::Record),
            })
            .collect();

        Ok(products)
    }

    /// Best-effort cache population; failures become advisories
    async fn write_back(&self, records: &[Variant], advisories: &mut Vec<Advisory>) {
        if records.is_empty() {
            return;
        }

        if let Err(e) = self.cache.batch_set(records, self.cache_ttl_seconds).await {
            warn!(error = %e, records = records.len(), "Cache write-back failed");
            HydrationMetrics::record_cache_write_failure(records.len());
            advisories.push(Advisory::CacheWriteFailed {
                records: records.len(),
                reason: e.to_string(),
            });
        }
    }
}
