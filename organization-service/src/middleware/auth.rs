use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};

use crate::{
    dtos::ErrorResponse,
    services::{TokenClaims, TokenKind},
    AppState,
};

/// Raw bearer token of the current request, kept for checks that need to
/// re-present it (the membership gate).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

enum BearerError {
    Missing,
    Malformed,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(BearerError::Malformed)
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Middleware to require a valid access token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(BearerError::Missing) => return Err(unauthorized("Missing Authorization header")),
        Err(BearerError::Malformed) => return Err(unauthorized("Invalid token")),
    };

    let claims = state.jwt.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        unauthorized("Invalid token")
    })?;

    // Refresh tokens only buy new tokens.
    if claims.token_use == Some(TokenKind::Refresh) {
        tracing::debug!("Refresh token presented as bearer credential");
        return Err(unauthorized("Invalid token"));
    }

    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

/// Extractor to easily get claims in handlers
pub struct AuthUser(pub TokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<TokenClaims>().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Auth claims missing from request extensions".to_string(),
            }),
        ))?;

        Ok(AuthUser(claims.clone()))
    }
}
