//! Typed ID definitions for the domain entities.
//!
//! Offers and users get distinct ID types so the compiler catches a swap
//! of the two.

pub use super::id::Id;

/// Marker type for Offer entities (product listings).
pub struct Offer;

/// Marker type for User entities. Users live in the identity collaborator;
/// the server only ever references them by id.
pub struct User;

/// Typed ID for Offer entities.
pub type OfferId = Id<Offer>;

/// Typed ID for User entities.
pub type UserId = Id<User>;
