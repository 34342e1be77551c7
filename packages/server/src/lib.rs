// Marketplace offers API
//
// Thin CRUD layer over Postgres with image assets delegated to Cloudinary.
// Architecture follows domain-driven design: business logic lives in
// domains/, HTTP wiring in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
