use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidateEmail};

use crate::dtos::{auth::SignUpRequest, ErrorResponse};
use crate::services::ServiceError;

pub const MIN_PASSWORD_CHARS: usize = 8;

pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            let err_resp = ErrorResponse {
                error: format!("Json parse error: {}", e),
            };
            (StatusCode::BAD_REQUEST, Json(err_resp)).into_response()
        })?;

        value.validate().map_err(|e| {
            let err_resp = ErrorResponse {
                error: format!("Validation error: {}", e),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(err_resp)).into_response()
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Canonical form used for storage, lookup and invited-set membership.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural checks on a registration candidate. Runs before any store or
/// hashing work; the first failing field is reported.
pub fn validate_identity(candidate: &SignUpRequest) -> Result<(), ServiceError> {
    if candidate.name.trim().is_empty() {
        return Err(invalid("name", "Name is required"));
    }

    let email = candidate.email.trim();
    if email.is_empty() {
        return Err(invalid("email", "Email is required"));
    }
    if !email.validate_email() {
        return Err(invalid("email", "Invalid email format"));
    }

    if candidate.password.is_empty() {
        return Err(invalid("password", "Password is required"));
    }
    if candidate.password.char_count() < MIN_PASSWORD_CHARS {
        return Err(invalid(
            "password",
            &format!("Password must be at least {} characters", MIN_PASSWORD_CHARS),
        ));
    }

    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> ServiceError {
    ServiceError::Validation {
        field,
        reason: reason.to_string(),
    }
}
