pub mod dtos;
pub mod handlers;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::trigger_ingest, crate::health::health_check),
    components(schemas(
        dtos::ErrorResponse,
        crate::health::HealthResponse,
        crate::ingest::RunSummary,
        crate::ingest::FeedReport,
        crate::ingest::FeedOutcome,
    )),
    tags(
        (name = "ingest", description = "Scheduled ingestion trigger"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
