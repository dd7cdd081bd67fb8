//! Scheduler authentication for the ingestion trigger.
//!
//! Schedulers differ in what they can send: some attach an Authorization
//! header, the more constrained ones can only append a query parameter, so
//! both `Authorization: Bearer <secret>` and `?token=<secret>` are accepted
//! against the configured cron secret.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::dtos::ErrorResponse;
use crate::app_state::AppState;

/// Extractor proving the request carried the cron secret. Handlers that take
/// one of these cannot run unauthorized.
#[derive(Debug, Clone)]
pub struct CronAuth;

impl<S> FromRequestParts<S> for CronAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let secret = app_state.config.cron_secret();

        if let Some(token) = bearer_token(parts) {
            if token == secret {
                return Ok(CronAuth);
            }
            return Err(AuthError::InvalidToken);
        }

        if let Some(token) = query_token(parts) {
            if token == secret {
                return Ok(CronAuth);
            }
            return Err(AuthError::InvalidToken);
        }

        Err(AuthError::MissingToken)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidToken => "Invalid authorization token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                success: false,
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
