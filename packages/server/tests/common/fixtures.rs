//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use rust_decimal::Decimal;
use server_core::common::{OfferId, UserId};
use server_core::domains::offers::{
    DetailKey, DetailRecord, ImageFile, Offer, PublishOffer,
};
use sqlx::PgPool;

/// The five detail slots in creation order.
pub fn standard_details() -> Vec<DetailRecord> {
    vec![
        DetailRecord::new(DetailKey::Brand, "Nike"),
        DetailRecord::new(DetailKey::Size, "42"),
        DetailRecord::new(DetailKey::Condition, "good"),
        DetailRecord::new(DetailKey::Color, "red"),
        DetailRecord::new(DetailKey::Location, "Paris"),
    ]
}

/// Insert an offer directly through the model, bypassing the media host.
pub async fn create_test_offer(
    pool: &PgPool,
    owner: UserId,
    name: &str,
    price: Decimal,
) -> Result<Offer> {
    let offer = Offer::create(
        OfferId::new(),
        name.to_string(),
        "a test offer".to_string(),
        price,
        standard_details(),
        None,
        owner,
        pool,
    )
    .await?;
    Ok(offer)
}

/// Insert an offer with a custom detail sequence.
pub async fn create_test_offer_with_details(
    pool: &PgPool,
    owner: UserId,
    name: &str,
    details: Vec<DetailRecord>,
) -> Result<Offer> {
    let offer = Offer::create(
        OfferId::new(),
        name.to_string(),
        "a test offer".to_string(),
        Decimal::new(1000, 2),
        details,
        None,
        owner,
        pool,
    )
    .await?;
    Ok(offer)
}

/// A small stand-in jpg upload.
pub fn test_picture() -> ImageFile {
    ImageFile {
        filename: "photo.jpg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// A fully-populated publish request.
pub fn publish_input(title: &str, price: &str) -> PublishOffer {
    PublishOffer {
        title: Some(title.to_string()),
        description: Some("barely worn".to_string()),
        price: Some(price.to_string()),
        brand: Some("Nike".to_string()),
        size: Some("42".to_string()),
        condition: Some("good".to_string()),
        city: Some("Paris".to_string()),
        color: Some("red".to_string()),
        picture: Some(test_picture()),
    }
}
