pub mod auth;
pub mod membership;

pub use auth::{auth_middleware, AuthUser, BearerToken};
pub use membership::InvitedMember;
