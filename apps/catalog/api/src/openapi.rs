use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Full-text search over product variants, hydrated from cache and store"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/products", api = domain_catalog::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
