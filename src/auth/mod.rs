//! Authentication: password hashing, token issuance/validation and the
//! request authentication pipeline.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtError, JwtManager, TokenCategory};
pub use middleware::{authenticate, require_auth, AuthState, AuthUser};
pub use password::{hash_password, verify_password, PasswordError};
