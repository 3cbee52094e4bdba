use axum::middleware::from_fn;
use axum_helpers::server::{CleanupCoordinator, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use domain_catalog::ElasticsearchGateway;
use observability::middleware::metrics_middleware;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    observability::init_metrics()
        .map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    // Connect the store and the cache concurrently, retrying while they start up
    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(
            config.database.clone(),
            Some(RetryConfig::startup()),
        )
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_from_config_with_retry(&config.redis, Some(RetryConfig::startup()))
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let search = ElasticsearchGateway::new(&config.elasticsearch)?;
    search
        .ensure_index()
        .await
        .map_err(|e| eyre::eyre!("Search index bootstrap failed: {}", e))?;
    info!(index = search.index_name(), "Search index ready");

    let state = AppState {
        config,
        db,
        redis,
        search,
    };

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness with app name/version
    // - /ready: database, cache and search probes
    // - /metrics: Prometheus scrape
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()))
        .merge(api::metrics_router())
        .layer(from_fn(metrics_middleware));

    let AppState {
        config, db, redis, ..
    } = state;

    let mut cleanup = CleanupCoordinator::new();
    cleanup.add_task("postgres", database::postgres::close(db));
    cleanup.add_task("redis", async move {
        // ConnectionManager closes on drop
        drop(redis);
        info!("Redis connection manager dropped");
    });

    info!(
        timeout = ?config.server.shutdown_timeout,
        "Starting catalog API with graceful shutdown"
    );

    create_production_app(app, &config.server, cleanup.run())
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
