use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::{api::dtos::ErrorResponse, app_state::AppState, auth::CronAuth, ingest};

/// Run one ingestion pass and report the summary.
///
/// Partial failures (timed-out feeds, rejected batches) surface as non-zero
/// counters inside a 200 response; only precondition failures, here the feed
/// registry not loading, produce an error status.
#[utoipa::path(
    post,
    path = "/api/ingest",
    tag = "ingest",
    responses(
        (status = 200, description = "Run completed, possibly with partial failures", body = ingest::RunSummary),
        (status = 401, description = "Missing or invalid cron secret", body = ErrorResponse),
        (status = 500, description = "Precondition failure, no run attempted", body = ErrorResponse)
    )
)]
pub async fn trigger_ingest(_auth: CronAuth, State(state): State<AppState>) -> Response {
    let result = ingest::run_ingestion(
        state.registry.as_ref(),
        state.store.as_ref(),
        state.config.ingest(),
    )
    .await;

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            error!(%err, "ingestion precondition failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    success: false,
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
