use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::Password;

/// Registration candidate. Checked by `validate_identity` before any work.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "Ana")]
    pub name: String,

    #[schema(example = "a@x.com")]
    pub email: String,

    #[schema(value_type = String, example = "longenough1", min_length = 8)]
    pub password: Password,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInRequest {
    #[schema(example = "a@x.com")]
    pub email: String,

    #[schema(value_type = String, example = "longenough1")]
    pub password: Password,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// A refresh token previously returned by sign-up, sign-in or refresh.
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9...")]
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "SignIn successful")]
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}
