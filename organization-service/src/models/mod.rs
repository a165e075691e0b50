pub mod identity;
pub mod organization;

pub use identity::Identity;
pub use organization::{Organization, OrganizationUpdate};
