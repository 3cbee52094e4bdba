use axum::Router;
use domain_catalog::{CatalogSearchService, PgVariantRepository, RedisCache, handlers};
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let cache = RedisCache::new(state.redis.clone(), state.config.redis.command_timeout());
    let repository = PgVariantRepository::new(state.db.clone());

    let service = CatalogSearchService::new(
        Arc::new(state.search.clone()),
        Arc::new(cache),
        Arc::new(repository),
        state.config.catalog.cache_ttl_seconds,
    );
    handlers::router(service)
}
