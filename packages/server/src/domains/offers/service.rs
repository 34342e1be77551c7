//! Orchestration of the four offer operations: publish, search, update,
//! delete. The service owns the ordering of store and media-host calls and
//! the compensation behavior when one of the two sides fails; every
//! external call runs under an explicit deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tokio::time::timeout;

use crate::common::{OfferId, UserId};
use crate::domains::offers::error::OfferError;
use crate::domains::offers::media::{ImageFile, MediaDestination, MediaStore};
use crate::domains::offers::models::details::{apply_detail_updates, DetailKey, DetailRecord};
use crate::domains::offers::models::offer::{Offer, OfferSummary};
use crate::domains::offers::query::ValidatedOfferQuery;

/// Publish request after multipart parsing. All fields arrive loosely typed.
#[derive(Debug, Default)]
pub struct PublishOffer {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub condition: Option<String>,
    pub city: Option<String>,
    pub color: Option<String>,
    pub picture: Option<ImageFile>,
}

impl PublishOffer {
    /// The five detail slots in their fixed creation order. Absent fields
    /// still claim a slot, with an empty value.
    fn initial_details(&self) -> Vec<DetailRecord> {
        let value = |field: &Option<String>| field.clone().unwrap_or_default();
        vec![
            DetailRecord::new(DetailKey::Brand, value(&self.brand)),
            DetailRecord::new(DetailKey::Size, value(&self.size)),
            DetailRecord::new(DetailKey::Condition, value(&self.condition)),
            DetailRecord::new(DetailKey::Color, value(&self.color)),
            DetailRecord::new(DetailKey::Location, value(&self.city)),
        ]
    }
}

/// Update request: any subset of the mutable fields.
#[derive(Debug, Default)]
pub struct UpdateOffer {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub condition: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub picture: Option<ImageFile>,
}

impl UpdateOffer {
    /// Supplied detail attributes, keyed by name.
    fn detail_updates(&self) -> Vec<(DetailKey, String)> {
        [
            (DetailKey::Brand, &self.brand),
            (DetailKey::Size, &self.size),
            (DetailKey::Condition, &self.condition),
            (DetailKey::Color, &self.color),
            (DetailKey::Location, &self.location),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

/// Search response: total match count plus one page of projections.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub count: i64,
    pub offers: Vec<OfferSummary>,
}

pub struct OfferService {
    pool: PgPool,
    media: Arc<dyn MediaStore>,
    upstream_timeout: Duration,
}

impl OfferService {
    pub fn new(pool: PgPool, media: Arc<dyn MediaStore>, upstream_timeout: Duration) -> Self {
        Self {
            pool,
            media,
            upstream_timeout,
        }
    }

    /// Create an offer: upload the picture into the offer's media folder,
    /// then persist the document. A persist failure after a successful
    /// upload triggers best-effort deletion of the orphaned assets.
    pub async fn publish(
        &self,
        owner: UserId,
        input: PublishOffer,
    ) -> Result<Offer, OfferError> {
        let name = required_text(&input.title, "title")?;
        let price = parse_price(input.price.as_deref())?;
        let picture = input
            .picture
            .clone()
            .ok_or_else(|| OfferError::Validation("a picture file is required".to_string()))?;
        if !picture.has_allowed_format() {
            return Err(OfferError::Validation(
                "picture must be a png or jpg file".to_string(),
            ));
        }

        let id = OfferId::new();
        let details = input.initial_details();
        let folder = media_folder(id);

        let asset = self
            .media_call(
                "image upload",
                self.media.upload(picture, MediaDestination::Folder(folder.clone())),
            )
            .await?;

        let created = self
            .store_call(
                "offer insert",
                Offer::create(
                    id,
                    name,
                    input.description.clone().unwrap_or_default(),
                    price,
                    details,
                    Some(asset),
                    owner,
                    &self.pool,
                ),
            )
            .await;

        match created {
            Ok(offer) => Ok(offer),
            Err(err) => {
                // Compensate: the asset is already in the media host but the
                // document never landed.
                tracing::warn!(offer_id = %id, error = %err, "persist failed after upload, removing orphaned assets");
                if let Err(cleanup_err) = self
                    .media_call("orphan cleanup", self.media.delete_by_prefix(&folder))
                    .await
                {
                    tracing::error!(offer_id = %id, error = %cleanup_err, "orphan cleanup failed");
                }
                Err(err)
            }
        }
    }

    /// Count all matches, then fetch the requested page of projections.
    pub async fn search(&self, query: ValidatedOfferQuery) -> Result<SearchResult, OfferError> {
        let count = self
            .store_call("offer count", Offer::count(&query, &self.pool))
            .await?;
        let offers = self
            .store_call("offer search", Offer::search(&query, &self.pool))
            .await?;
        Ok(SearchResult { count, offers })
    }

    /// Field-level merge into an existing offer. Only the owner may update;
    /// a supplied detail attribute the offer does not carry is rejected.
    pub async fn update(
        &self,
        id: OfferId,
        caller: UserId,
        input: UpdateOffer,
    ) -> Result<Offer, OfferError> {
        let mut offer = self.load_owned(id, caller).await?;

        if let Some(title) = non_empty(&input.title) {
            offer.name = title;
        }
        if let Some(description) = input.description.clone() {
            offer.description = description;
        }
        if input.price.is_some() {
            offer.price = parse_price(input.price.as_deref())?;
        }

        apply_detail_updates(&mut offer.details.0, &input.detail_updates())
            .map_err(|key| {
                OfferError::Validation(format!("offer has no '{key}' attribute to update"))
            })?;

        if let Some(picture) = input.picture.clone() {
            if !picture.has_allowed_format() {
                return Err(OfferError::Validation(
                    "picture must be a png or jpg file".to_string(),
                ));
            }
            let asset = self
                .media_call(
                    "image upload",
                    self.media
                        .upload(picture, MediaDestination::PublicId(preview_id(id))),
                )
                .await?;
            offer.image = Some(sqlx::types::Json(asset));
        }

        self.store_call("offer update", offer.save(&self.pool)).await
    }

    /// Remove an offer: media assets first, then the folder, then the
    /// document. If the document delete fails after the media is gone, the
    /// row is marked so a retry skips the media calls.
    pub async fn delete(&self, id: OfferId, caller: UserId) -> Result<(), OfferError> {
        let offer = self.load_owned(id, caller).await?;
        let folder = media_folder(id);

        if !offer.media_purged {
            self.media_call("media deletion", self.media.delete_by_prefix(&folder))
                .await?;
            self.media_call("folder deletion", self.media.delete_folder(&folder))
                .await?;
        }

        match self
            .store_call("offer delete", Offer::delete(id, &self.pool))
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                // The media is gone but the row survived. Mark it so the
                // degraded state is visible and a retry does not re-issue
                // media calls.
                tracing::warn!(offer_id = %id, error = %err, "document delete failed after media cleanup");
                if let Err(mark_err) = Offer::mark_media_purged(id, &self.pool).await {
                    tracing::error!(offer_id = %id, error = %mark_err, "failed to mark offer media_purged");
                }
                Err(err)
            }
        }
    }

    /// Load an offer and enforce owner-only mutation.
    async fn load_owned(&self, id: OfferId, caller: UserId) -> Result<Offer, OfferError> {
        let offer = self
            .store_call("offer lookup", Offer::find_by_id(id, &self.pool))
            .await?
            .ok_or(OfferError::NotFound(id))?;
        if offer.owner_id != caller {
            return Err(OfferError::Forbidden);
        }
        Ok(offer)
    }

    async fn store_call<T, F>(&self, op: &'static str, fut: F) -> Result<T, OfferError>
    where
        F: Future<Output = sqlx::Result<T>>,
    {
        match timeout(self.upstream_timeout, fut).await {
            Ok(result) => result.map_err(OfferError::from),
            Err(_) => Err(OfferError::Timeout(op)),
        }
    }

    async fn media_call<T, F>(&self, op: &'static str, fut: F) -> Result<T, OfferError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match timeout(self.upstream_timeout, fut).await {
            Ok(result) => result.map_err(OfferError::Upstream),
            Err(_) => Err(OfferError::Timeout(op)),
        }
    }
}

/// Media folder for an offer; the listing id is the namespace.
fn media_folder(id: OfferId) -> String {
    format!("offers/{id}")
}

/// Fixed public id for the replacement image uploaded on update.
fn preview_id(id: OfferId) -> String {
    format!("offers/{id}/preview")
}

fn required_text(field: &Option<String>, name: &str) -> Result<String, OfferError> {
    non_empty(field).ok_or_else(|| OfferError::Validation(format!("{name} is required")))
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn parse_price(raw: Option<&str>) -> Result<Decimal, OfferError> {
    let price: Decimal = raw
        .unwrap_or("")
        .trim()
        .parse()
        .map_err(|_| OfferError::Validation("price must be a number".to_string()))?;
    if price < Decimal::ZERO {
        return Err(OfferError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    Ok(price)
}
