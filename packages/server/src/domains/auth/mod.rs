pub mod errors;
pub mod jwt;

pub use errors::AuthError;
pub use jwt::{Claims, JwtService};
