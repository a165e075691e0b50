use std::sync::Arc;

use crate::services::{JwtService, OrganizationStore, ServiceError};
use crate::utils::normalize_email;

/// Decides whether a token's holder may act on a gated organization.
///
/// The token is always verified before the store is read, and any
/// uncertainty (unknown organization, store failure) ends in a denial.
#[derive(Clone)]
pub struct MembershipGate {
    jwt: JwtService,
    organizations: Arc<dyn OrganizationStore>,
}

impl MembershipGate {
    pub fn new(jwt: JwtService, organizations: Arc<dyn OrganizationStore>) -> Self {
        Self { jwt, organizations }
    }

    /// `Ok(false)` means a valid token whose email is not invited.
    pub async fn authorize(&self, organization_id: &str, token: &str) -> Result<bool, ServiceError> {
        let email = self.caller_email(token)?;

        self.is_invited(organization_id, &email).await
    }

    /// Like [`authorize`](Self::authorize), turning a denial into
    /// `AuthorizationDenied`. Returns the caller's email.
    pub async fn require_member(
        &self,
        organization_id: &str,
        token: &str,
    ) -> Result<String, ServiceError> {
        let email = self.caller_email(token)?;

        if !self.is_invited(organization_id, &email).await? {
            return Err(ServiceError::AuthorizationDenied);
        }

        Ok(email)
    }

    /// Verified email claim, normalized the way invites are stored.
    fn caller_email(&self, token: &str) -> Result<String, ServiceError> {
        self.jwt
            .extract_email(token)
            .map(|email| normalize_email(&email))
            .map_err(ServiceError::InvalidToken)
    }

    async fn is_invited(&self, organization_id: &str, email: &str) -> Result<bool, ServiceError> {
        let Some(org) = self
            .organizations
            .find_organization_by_id(organization_id)
            .await?
        else {
            tracing::debug!(organization_id = %organization_id, "Unknown organization");
            return Ok(false);
        };

        Ok(org.is_invited(email))
    }
}
