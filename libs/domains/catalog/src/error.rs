use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid search request: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Search engine unavailable: {0}")]
    SearchEngineUnavailable(String),

    #[error("Variant store unavailable: {0}")]
    StoreUnavailable(String),

    /// Write-back failure; reported as an advisory, never to the caller
    #[error("Cache write failed: {0}")]
    CacheWrite(String),

    /// Cache read transport failure; reported as an advisory, never to the caller
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        CatalogError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::SearchEngineUnavailable(err.to_string())
    }
}

impl From<redis::RedisError> for CatalogError {
    fn from(err: redis::RedisError) -> Self {
        CatalogError::CacheUnavailable(err.to_string())
    }
}

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(errors) => AppError::ValidationError(errors),
            CatalogError::SearchEngineUnavailable(msg) => {
                AppError::ServiceUnavailable(format!("search engine: {}", msg))
            }
            CatalogError::StoreUnavailable(msg) => {
                AppError::ServiceUnavailable(format!("variant store: {}", msg))
            }
            CatalogError::CacheWrite(msg) | CatalogError::CacheUnavailable(msg) => {
                AppError::ServiceUnavailable(format!("cache: {}", msg))
            }
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
