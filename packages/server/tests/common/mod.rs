// Common test utilities

pub mod fixtures;
pub mod harness;
pub mod media;

pub use fixtures::*;
pub use harness::*;
pub use media::*;
