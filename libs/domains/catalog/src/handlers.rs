use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use axum_helpers::errors::responses::{
    BadRequestValidationResponse, InternalServerErrorResponse, ServiceUnavailableResponse,
};
use std::borrow::Cow;
use std::sync::Arc;
use utoipa::OpenApi;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::cache::VariantCache;
use crate::error::CatalogResult;
use crate::index::SearchIndex;
use crate::models::{
    AttributeValue, HydratedVariant, SearchParams, SearchRequest, SearchResponse, Variant,
};
use crate::repository::VariantRepository;
use crate::service::CatalogSearchService;

pub const TAG: &str = "products";

/// OpenAPI documentation for the catalog search API
#[derive(OpenApi)]
#[openapi(
    paths(search_products),
    components(
        schemas(SearchResponse, HydratedVariant, Variant, AttributeValue),
        responses(
            BadRequestValidationResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product variant search")
    )
)]
pub struct ApiDoc;

/// Create the catalog router; mount it under `/products`
pub fn router<I, C, R>(service: CatalogSearchService<I, C, R>) -> Router
where
    I: SearchIndex + 'static,
    C: VariantCache + 'static,
    R: VariantRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/search", get(search_products))
        .with_state(shared_service)
}

/// Full-text search over product variants, ranked by units sold
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(
        SearchParams,
        ("filter[attribute]" = Option<String>, Query,
            description = "Exact-match attribute filter, repeatable, e.g. filter[color]=red")
    ),
    responses(
        (status = 200, description = "Ranked page of variants", body = SearchResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<I, C, R>(
    State(service): State<Arc<CatalogSearchService<I, C, R>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogResult<Json<SearchResponse>>
where
    I: SearchIndex,
    C: VariantCache,
    R: VariantRepository,
{
    let request = parse_search_params(params)?;
    let outcome = service.search(request).await?;
    Ok(Json(outcome.response))
}

/// Build a request from raw query pairs
///
/// `filter[name]=value` pairs become attribute filters; unknown parameters
/// are ignored. Range checks happen in the service unless a paging value
/// fails to parse, in which case they are reported here alongside it.
pub fn parse_search_params(
    params: Vec<(String, String)>,
) -> Result<SearchRequest, ValidationErrors> {
    let mut request = SearchRequest::default();
    let mut errors = ValidationErrors::new();

    for (key, value) in params {
        match key.as_str() {
            "query" => request.query = Some(value),
            "skip" => match value.trim().parse() {
                Ok(skip) => request.skip = skip,
                Err(_) => errors.add("skip", not_an_integer(value)),
            },
            "limit" => match value.trim().parse() {
                Ok(limit) => request.limit = limit,
                Err(_) => errors.add("limit", not_an_integer(value)),
            },
            other => {
                if let Some(attribute) = filter_attribute(other) {
                    request
                        .filter
                        .insert(attribute.to_string(), AttributeValue::infer(&value));
                }
            }
        }
    }

    if errors.is_empty() {
        return Ok(request);
    }

    // Report every violated field, not just the unparsable ones
    if let Err(invalid) = request.validate() {
        for (field, kind) in invalid.into_errors() {
            errors.errors_mut().entry(field).or_insert(kind);
        }
    }
    Err(errors)
}

fn filter_attribute(key: &str) -> Option<&str> {
    key.strip_prefix("filter[")
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|attribute| !attribute.is_empty())
}

fn not_an_integer(value: String) -> ValidationError {
    let mut error = ValidationError::new("integer");
    error.message = Some(Cow::Borrowed("must be an integer"));
    error.add_param(Cow::Borrowed("value"), &value);
    error
}
