use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jobfinder API",
        version = "0.1.0",
        description = "Cached job search over a rendered listings page."
    ),
    paths(crate::routes::search, crate::routes::health),
    components(schemas(
        crate::dto::SearchResponse,
        crate::dto::JobResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "search", description = "Job search"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
