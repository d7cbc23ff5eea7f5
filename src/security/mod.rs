pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtManager};
pub use password::PasswordManager;
