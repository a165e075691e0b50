use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

use crate::{dtos::ErrorResponse, middleware::BearerToken, AppState};

/// Caller who passed the membership gate for the `:organization_id` in the path.
///
/// Must run behind `auth_middleware`, which leaves the bearer token in the
/// request extensions.
#[derive(Debug, Clone)]
pub struct InvitedMember {
    pub organization_id: String,
    pub email: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for InvitedMember {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(organization_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let BearerToken(token) = parts.extensions.get::<BearerToken>().cloned().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Bearer token missing from request extensions".to_string(),
                }),
            )
                .into_response()
        })?;

        let email = state
            .membership
            .require_member(&organization_id, &token)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(InvitedMember {
            organization_id,
            email,
        })
    }
}
