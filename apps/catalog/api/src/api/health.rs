//! Readiness probe over the three external dependencies.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check: Postgres ping, Redis `PING` and search engine ping,
/// run concurrently. 200 when all pass, 503 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "cache",
            Box::pin(async {
                let mut redis = state.redis.clone();
                database::redis::check_health(&mut redis)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "search",
            Box::pin(async {
                state
                    .search
                    .ping()
                    .await
                    .map_err(|e| format!("Search engine ping failed: {}", e))
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
