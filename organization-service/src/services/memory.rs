use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

use crate::models::{Identity, Organization, OrganizationUpdate};
use crate::services::{IdentityStore, OrganizationStore, ServiceError};

/// Process-local store for tests and `STORE_BACKEND=memory` runs.
///
/// Identities are keyed by email, so the entry API gives the same uniqueness
/// guarantee as the MongoDB index.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    identities: Arc<DashMap<String, Identity>>,
    organizations: Arc<DashMap<String, Organization>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>, ServiceError> {
        Ok(self.identities.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert_identity(&self, identity: Identity) -> Result<Identity, ServiceError> {
        match self.identities.entry(identity.email.clone()) {
            Entry::Occupied(_) => Err(ServiceError::DuplicateIdentity),
            Entry::Vacant(slot) => {
                slot.insert(identity.clone());
                Ok(identity)
            }
        }
    }
}

#[async_trait]
impl OrganizationStore for InMemoryStore {
    async fn find_organization_by_id(
        &self,
        id: &str,
    ) -> Result<Option<Organization>, ServiceError> {
        Ok(self.organizations.get(id).map(|entry| entry.value().clone()))
    }

    async fn add_invite(&self, id: &str, email: &str) -> Result<(), ServiceError> {
        let mut org = self
            .organizations
            .get_mut(id)
            .ok_or(ServiceError::OrganizationNotFound)?;
        org.invite(email.to_string());
        Ok(())
    }

    async fn create_organization(&self, org: Organization) -> Result<Organization, ServiceError> {
        self.organizations.insert(org.id.clone(), org.clone());
        Ok(org)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ServiceError> {
        let mut orgs: Vec<Organization> = self
            .organizations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        orgs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orgs)
    }

    async fn update_organization(
        &self,
        id: &str,
        update: OrganizationUpdate,
    ) -> Result<Option<Organization>, ServiceError> {
        Ok(self.organizations.get_mut(id).map(|mut org| {
            org.apply(update);
            org.value().clone()
        }))
    }

    async fn delete_organization(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.organizations.remove(id).is_some())
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
