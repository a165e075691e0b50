use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

/// The only algorithm this service signs with or accepts.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT service for token issuance and verification (HMAC, shared secret)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
    refresh_token_expiry_hours: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity carried by every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Display name of the identity
    pub username: String,
    /// Normalized email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Absent on tokens minted by other issuers sharing the secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<TokenKind>,
}

impl TokenClaims {
    pub fn identity(&self) -> IdentityClaims {
        IdentityClaims {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Algorithm not allowed: {0}")]
    DisallowedAlgorithm(String),

    #[error("Token kind not accepted here")]
    UnexpectedKind,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        let secret = config.secret.expose_secret().as_bytes();
        if secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }

        tracing::info!("JWT service initialized with HS256 shared secret");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_hours: config.refresh_token_expiry_hours,
        })
    }

    fn ttl(&self, kind: TokenKind) -> Result<Duration, TokenError> {
        match kind {
            TokenKind::Access => Duration::try_minutes(self.access_token_expiry_minutes),
            TokenKind::Refresh => Duration::try_hours(self.refresh_token_expiry_hours),
        }
        .ok_or_else(|| TokenError::Signing(format!("{:?} token lifetime out of range", kind)))
    }

    pub fn issue(&self, identity: &IdentityClaims, kind: TokenKind) -> Result<String, TokenError> {
        self.issue_at(identity, kind, Utc::now())
    }

    /// Sign a token whose lifetime starts at `now`.
    pub fn issue_at(
        &self,
        identity: &IdentityClaims,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let exp = now
            .checked_add_signed(self.ttl(kind)?)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            username: identity.username.clone(),
            email: identity.email.clone(),
            exp: exp.timestamp(),
            token_use: Some(kind),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Generate both access and refresh tokens
    pub fn issue_pair(&self, identity: &IdentityClaims) -> Result<TokenPair, TokenError> {
        let now = Utc::now();

        Ok(TokenPair {
            access_token: self.issue_at(identity, TokenKind::Access, now)?,
            refresh_token: self.issue_at(identity, TokenKind::Refresh, now)?,
        })
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify algorithm, signature and expiry as of `now`.
    ///
    /// The header is checked before the signature so that tokens declaring
    /// any other algorithm never reach the key.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let header = decode_header(token).map_err(|e| TokenError::Malformed(e.to_string()))?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(TokenError::DisallowedAlgorithm(format!("{:?}", header.alg)));
        }

        // Expiry is compared below against the caller's clock, with no leeway.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => {
                    TokenError::DisallowedAlgorithm(format!("{:?}", header.alg))
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            },
        )?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }

    pub fn extract_email(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token).map(|claims| claims.email)
    }

    /// Get access token expiry in seconds (for client info)
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes.saturating_mul(60)
    }
}
