//! Authentication module
//!
//! Provides JWT-based authentication with argon2 password hashing
//! and the ownership guard for user-owned resources.

mod guard;
mod jwt;
mod middleware;
mod password;

pub use guard::{ensure_owner, Owned};
pub use jwt::{Claims, JwtService};
pub use middleware::{authenticate, AuthUser, AUTH_TOKEN_HEADER};
pub use password::PasswordService;
