//! Persistence seams consumed by the session issuer and the membership gate.

use async_trait::async_trait;

use crate::models::{Identity, Organization, OrganizationUpdate};
use crate::services::ServiceError;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up an identity by its normalized email.
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>, ServiceError>;

    /// Persist a new identity. A second identity with the same email is
    /// `ServiceError::DuplicateIdentity`.
    async fn insert_identity(&self, identity: Identity) -> Result<Identity, ServiceError>;
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn find_organization_by_id(&self, id: &str)
        -> Result<Option<Organization>, ServiceError>;

    /// Idempotent set-add of `email` to the organization's invited set.
    async fn add_invite(&self, id: &str, email: &str) -> Result<(), ServiceError>;

    async fn create_organization(&self, org: Organization) -> Result<Organization, ServiceError>;

    async fn list_organizations(&self) -> Result<Vec<Organization>, ServiceError>;

    /// Returns the updated organization, or `None` when the id is unknown.
    async fn update_organization(
        &self,
        id: &str,
        update: OrganizationUpdate,
    ) -> Result<Option<Organization>, ServiceError>;

    /// Returns whether an organization was removed.
    async fn delete_organization(&self, id: &str) -> Result<bool, ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}
