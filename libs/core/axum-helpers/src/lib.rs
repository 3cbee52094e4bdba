//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! - **[`errors`]**: `AppError`, `ErrorCode` and the `ErrorResponse` body
//! - **[`server`]**: router assembly with OpenAPI docs, health and readiness
//!   endpoints, graceful shutdown with resource cleanup
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes)?
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &ServerConfig::default(), cleanup).await?;
//! ```

pub mod errors;
pub mod server;

pub use server::{
    CleanupCoordinator, HealthCheckFuture, HealthResponse, ShutdownCoordinator,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};
