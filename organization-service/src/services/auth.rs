use std::sync::Arc;

use crate::{
    dtos::auth::{AuthResponse, RefreshRequest, SignInRequest, SignUpRequest},
    models::Identity,
    services::{IdentityClaims, IdentityStore, JwtService, ServiceError, TokenError, TokenKind},
    utils::{hash_password, normalize_email, validate_identity, verify_password, PasswordHashString},
};

/// Issues sessions: registration, password sign-in and refresh.
#[derive(Clone)]
pub struct AuthService {
    identities: Arc<dyn IdentityStore>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(identities: Arc<dyn IdentityStore>, jwt: JwtService) -> Self {
        Self { identities, jwt }
    }

    pub async fn sign_up(&self, req: SignUpRequest) -> Result<AuthResponse, ServiceError> {
        validate_identity(&req)?;

        let email = normalize_email(&req.email);

        if self.identities.find_identity_by_email(&email).await?.is_some() {
            return Err(ServiceError::DuplicateIdentity);
        }

        let password_hash = hash_password(&req.password)?;

        // The store's uniqueness guarantee settles a concurrent sign-up race.
        let identity = self
            .identities
            .insert_identity(Identity::new(
                req.name.trim().to_string(),
                email,
                password_hash.into_string(),
            ))
            .await?;

        tracing::info!(identity_id = %identity.id, "Identity registered");

        self.session_for(
            IdentityClaims {
                username: identity.name,
                email: identity.email,
            },
            "User created successfully",
        )
    }

    pub async fn sign_in(&self, req: SignInRequest) -> Result<AuthResponse, ServiceError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(ServiceError::InvalidCredentials);
        }

        let identity = self
            .identities
            .find_identity_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let stored_hash = PasswordHashString::new(identity.password_hash.clone());
        if !verify_password(&req.password, &stored_hash)? {
            tracing::debug!(identity_id = %identity.id, "Password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!(identity_id = %identity.id, "Identity signed in");

        self.session_for(
            IdentityClaims {
                username: identity.name,
                email: identity.email,
            },
            "SignIn successful",
        )
    }

    /// Exchange a refresh token for a fresh pair carrying the same identity.
    pub async fn refresh(&self, req: RefreshRequest) -> Result<AuthResponse, ServiceError> {
        let claims = self
            .jwt
            .verify(&req.token)
            .map_err(ServiceError::InvalidToken)?;

        if claims.token_use == Some(TokenKind::Access) {
            return Err(ServiceError::InvalidToken(TokenError::UnexpectedKind));
        }

        self.session_for(claims.identity(), "Tokens refreshed")
    }

    fn session_for(
        &self,
        identity: IdentityClaims,
        message: &str,
    ) -> Result<AuthResponse, ServiceError> {
        let pair = self
            .jwt
            .issue_pair(&identity)
            .map_err(ServiceError::Signing)?;

        Ok(AuthResponse {
            message: message.to_string(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_seconds(),
        })
    }
}
