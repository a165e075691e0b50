pub mod password;
pub mod validation;

pub use password::{hash_password, verify_password, HashingError, Password, PasswordHashString};
pub use validation::{normalize_email, validate_identity, ValidatedJson};
