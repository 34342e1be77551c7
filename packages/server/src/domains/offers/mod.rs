pub mod error;
pub mod media;
pub mod models;
pub mod query;
pub mod service;

// Re-export the domain error
pub use error::OfferError;

// Re-export models
pub use models::details::{DetailKey, DetailRecord};
pub use models::offer::{Offer, OfferSummary};

// Re-export the media seam
pub use media::{ImageFile, MediaAsset, MediaDestination, MediaStore};

// Re-export query types
pub use query::{OfferQuery, SortKey, ValidatedOfferQuery};

// Re-export the service and its inputs
pub use service::{OfferService, PublishOffer, SearchResult, UpdateOffer};
