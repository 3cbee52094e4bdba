//! Connectors for the catalog's durable store (PostgreSQL) and cache (Redis)
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `redis` (default) - Redis support over a `ConnectionManager`
//! - `config` - `core_config::FromEnv` implementations for the configs
//! - `all` - everything above
//!
//! ```ignore
//! use database::{postgres, redis};
//! use database::common::RetryConfig;
//!
//! let (db, cache) = tokio::try_join!(
//!     postgres::connect_from_config_with_retry(pg_config, Some(RetryConfig::startup())),
//!     redis::connect_from_config_with_retry(&redis_config, Some(RetryConfig::startup())),
//! )?;
//! postgres::run_migrations::<migration::Migrator>(&db, "catalog_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult};
