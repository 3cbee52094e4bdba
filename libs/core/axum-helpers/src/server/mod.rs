//! Server infrastructure: router assembly with OpenAPI docs, health and
//! readiness endpoints, graceful shutdown and resource cleanup.

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

pub use app::{cors_layer_from_env, create_production_app, create_router};
pub use cleanup::CleanupCoordinator;
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
