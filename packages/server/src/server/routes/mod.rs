// HTTP routes
pub mod health;
pub mod offers;

pub use health::*;
pub use offers::*;
