//! REST handlers for the offer endpoints.
//!
//! Handlers stay thin: multipart/query parsing here, all behavior in
//! `OfferService`.

use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart, Path, Query};
use axum::Json;

use crate::domains::offers::{
    ImageFile, Offer, OfferError, OfferQuery, PublishOffer, SearchResult, UpdateOffer,
};
use crate::common::OfferId;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// POST /offer/publish
pub async fn publish_offer(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<Offer>, OfferError> {
    let form = read_offer_form(multipart).await?;
    let input = PublishOffer {
        title: form.title,
        description: form.description,
        price: form.price,
        brand: form.brand,
        size: form.size,
        condition: form.condition,
        city: form.city,
        color: form.color,
        picture: form.picture,
    };

    let offer = state.offers.publish(user.user_id, input).await?;
    Ok(Json(offer))
}

/// GET /offers
pub async fn search_offers(
    Extension(state): Extension<AppState>,
    Query(query): Query<OfferQuery>,
) -> Result<Json<SearchResult>, OfferError> {
    let result = state.offers.search(query.validate()).await?;
    Ok(Json(result))
}

/// PUT /offer/update/:id
pub async fn update_offer(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Offer>, OfferError> {
    let id = parse_offer_id(&id)?;
    let form = read_offer_form(multipart).await?;
    let input = UpdateOffer {
        title: form.title,
        description: form.description,
        price: form.price,
        brand: form.brand,
        size: form.size,
        condition: form.condition,
        color: form.color,
        location: form.location,
        picture: form.picture,
    };

    let offer = state.offers.update(id, user.user_id, input).await?;
    Ok(Json(offer))
}

/// DELETE /offer/delete/:id
pub async fn delete_offer(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, OfferError> {
    let id = parse_offer_id(&id)?;
    state.offers.delete(id, user.user_id).await?;
    Ok(Json("Offer deleted successfully"))
}

fn parse_offer_id(raw: &str) -> Result<OfferId, OfferError> {
    OfferId::parse(raw)
        .map_err(|_| OfferError::Validation(format!("'{raw}' is not a valid offer id")))
}

/// Fields shared by the publish and update forms.
#[derive(Debug, Default)]
struct OfferForm {
    title: Option<String>,
    description: Option<String>,
    price: Option<String>,
    brand: Option<String>,
    size: Option<String>,
    condition: Option<String>,
    city: Option<String>,
    color: Option<String>,
    location: Option<String>,
    picture: Option<ImageFile>,
}

async fn read_offer_form(mut multipart: Multipart) -> Result<OfferForm, OfferError> {
    let mut form = OfferForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        if name == "picture" {
            let filename = field.file_name().unwrap_or("picture").to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            form.picture = Some(ImageFile {
                filename,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "title" => form.title = Some(value),
            "description" => form.description = Some(value),
            "price" => form.price = Some(value),
            "brand" => form.brand = Some(value),
            "size" => form.size = Some(value),
            "condition" => form.condition = Some(value),
            "city" => form.city = Some(value),
            "color" => form.color = Some(value),
            "location" => form.location = Some(value),
            // Unknown form fields are ignored
            _ => {}
        }
    }

    Ok(form)
}

fn bad_multipart(err: MultipartError) -> OfferError {
    OfferError::Validation(format!("malformed multipart body: {err}"))
}
