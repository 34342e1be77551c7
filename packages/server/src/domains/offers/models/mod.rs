pub mod details;
pub mod offer;

pub use details::{DetailKey, DetailRecord};
pub use offer::{Offer, OfferSummary};
