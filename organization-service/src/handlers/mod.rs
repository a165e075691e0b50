//! HTTP handlers for organization-service.

pub mod auth;
pub mod organization;

pub use auth::{refresh_token, sign_in, sign_up};
pub use organization::{
    create_organization, delete_organization, get_organization, invite_user,
    list_organizations, update_organization,
};
