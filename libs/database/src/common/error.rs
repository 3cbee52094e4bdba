/// Error type shared by the PostgreSQL and Redis connectors
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// A command did not complete within its configured deadline
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
