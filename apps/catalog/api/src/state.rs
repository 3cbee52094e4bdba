//! Shared application state.
//!
//! Holds the three clients the process owns. Cloning is cheap: the pool,
//! the Redis manager and the HTTP client are all reference-counted.

use domain_catalog::ElasticsearchGateway;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool (variant store)
    pub db: database::postgres::DatabaseConnection,
    /// Redis connection manager (record cache)
    pub redis: database::redis::ConnectionManager,
    /// Search index gateway
    pub search: ElasticsearchGateway,
}
