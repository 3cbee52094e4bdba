//! Catalog Domain
//!
//! Product-variant search. The core is the hydration pipeline that turns a
//! ranked page of ids from the search index into full variant records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Handlers   │  ← GET /products/search
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   Service    │  ← validation, hydration, write-back, advisories
//! └──┬───┬───┬───┘
//!    │   │   │
//!    │   │   └──────────────────┐
//!    │   └─────────┐            │
//! ┌──▼─────────┐ ┌─▼──────────┐ ┌▼─────────────┐
//! │ SearchIndex│ │VariantCache│ │ Repository   │
//! │(Elastic)   │ │(Redis)     │ │(Postgres)    │
//! └────────────┘ └────────────┘ └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers, CatalogSearchService, ElasticsearchConfig, ElasticsearchGateway,
//!     InMemoryVariantRepository, RedisCache,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn build(conn: redis::aio::ConnectionManager) -> Result<(), Box<dyn std::error::Error>> {
//! let index = ElasticsearchGateway::new(&ElasticsearchConfig::new("http://localhost:9200"))?;
//! let cache = RedisCache::new(conn, Duration::from_secs(5));
//! let repository = InMemoryVariantRepository::new();
//!
//! let service = CatalogSearchService::new(Arc::new(index), Arc::new(cache), Arc::new(repository), 60);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod elasticsearch;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod index;
pub mod models;
pub mod postgres;
pub mod redis_cache;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use cache::VariantCache;
pub use config::{CatalogConfig, ElasticsearchConfig};
pub use elasticsearch::ElasticsearchGateway;
pub use error::{CatalogError, CatalogResult};
pub use index::{IndexPage, IndexQuery, SearchIndex};
pub use models::{
    Advisory, AttributeValue, Attributes, CachedValue, HydratedVariant, SearchDocument,
    SearchOutcome, SearchRequest, SearchResponse, Variant,
};
pub use postgres::PgVariantRepository;
pub use redis_cache::RedisCache;
pub use repository::{InMemoryVariantRepository, VariantRepository};
pub use service::CatalogSearchService;
