use service_core::error::AppError;
use thiserror::Error;

use crate::services::jwt::TokenError;
use crate::utils::HashingError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Identity already exists")]
    DuplicateIdentity,

    /// Verification detail stays in the source chain for logs.
    #[error("Invalid token")]
    InvalidToken(#[source] TokenError),

    #[error("User is not invited to the organization")]
    AuthorizationDenied,

    #[error("Organization not found")]
    OrganizationNotFound,

    #[error("Password hashing error: {0}")]
    Hashing(#[from] HashingError),

    #[error("Token signing error: {0}")]
    Signing(#[source] TokenError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::from(e),
            ServiceError::Storage(e) => AppError::DatabaseError(e),
            ServiceError::Validation { field, reason } => {
                AppError::UnprocessableEntity(anyhow::anyhow!("{}: {}", field, reason))
            }
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::DuplicateIdentity => {
                AppError::Conflict(anyhow::anyhow!("Identity already exists"))
            }
            ServiceError::InvalidToken(e) => {
                tracing::debug!(error = %e, "Token rejected");
                AppError::Unauthorized(anyhow::anyhow!("Invalid token"))
            }
            ServiceError::AuthorizationDenied => AppError::Forbidden(anyhow::anyhow!(
                "User is not invited to the organization"
            )),
            ServiceError::OrganizationNotFound => {
                AppError::NotFound(anyhow::anyhow!("Organization not found"))
            }
            ServiceError::Hashing(e) => AppError::InternalError(anyhow::Error::new(e)),
            ServiceError::Signing(e) => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}
