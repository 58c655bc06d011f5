//! Authentication
//!
//! JWT bearer tokens identify the caller; argon2 protects stored passwords.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenKind};
pub use middleware::AuthUser;
pub use password::PasswordService;
