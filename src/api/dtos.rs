use serde::Serialize;
use utoipa::ToSchema;

/// Error payload for rejected or failed requests. `success` mirrors the flag
/// the scheduler checks on the happy path.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
