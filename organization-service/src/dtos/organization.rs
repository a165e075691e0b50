use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Organization, OrganizationUpdate};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Acme")]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Rocket supplies")]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Acme Corp")]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Rocket supplies and more")]
    pub description: String,
}

impl From<UpdateOrganizationRequest> for OrganizationUpdate {
    fn from(req: UpdateOrganizationRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InviteRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "b@x.com")]
    pub user_email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganizationCreatedResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub organization_id: String,
}

/// Detail view returned to invited members.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganizationDetails {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<Organization> for OrganizationDetails {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            description: org.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganizationUpdatedResponse {
    pub organization_id: String,
    pub name: String,
    pub description: String,
}

impl From<Organization> for OrganizationUpdatedResponse {
    fn from(org: Organization) -> Self {
        Self {
            organization_id: org.id,
            name: org.name,
            description: org.description,
        }
    }
}

/// List entry. Invited emails are sorted for stable output.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub invited_emails: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        let mut invited_emails: Vec<String> = org.invited_emails.into_iter().collect();
        invited_emails.sort();

        Self {
            id: org.id,
            name: org.name,
            description: org.description,
            invited_emails,
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}
