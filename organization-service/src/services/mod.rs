//! Core services: session issuance, token codec, membership gate and the
//! persistence collaborators behind them.

pub mod auth;
mod database;
pub mod error;
pub mod jwt;
mod memory;
pub mod membership;
pub mod store;

pub use auth::AuthService;
pub use database::MongoDb;
pub use error::ServiceError;
pub use jwt::{IdentityClaims, JwtService, TokenClaims, TokenError, TokenKind, TokenPair};
pub use memory::InMemoryStore;
pub use membership::MembershipGate;
pub use store::{IdentityStore, OrganizationStore};
