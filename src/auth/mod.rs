pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::{Claims, Identity};
pub use jwt::JwtService;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
