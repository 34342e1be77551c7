use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::common::{OfferId, UserId};
use crate::domains::offers::media::MediaAsset;
use crate::domains::offers::models::details::DetailRecord;
use crate::domains::offers::query::{SortKey, ValidatedOfferQuery};

/// Offer - a marketplace product listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Offer {
    pub id: OfferId,
    pub name: String,
    pub description: String,
    pub price: Decimal,

    /// Ordered single-key attribute records (brand, size, condition,
    /// color, location). Slots are fixed at creation.
    pub details: Json<Vec<DetailRecord>>,

    /// Media host asset descriptor; NULL until an upload succeeded.
    pub image: Option<Json<MediaAsset>>,

    pub owner_id: UserId,

    /// Media assets already removed, row deletion still pending.
    #[serde(skip_serializing, default)]
    pub media_purged: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Search projection: name and price only.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OfferSummary {
    pub name: String,
    pub price: Decimal,
}

// =============================================================================
// SQL queries - ALL queries must be in models/
// =============================================================================

impl Offer {
    /// Find offer by ID
    pub async fn find_by_id(id: OfferId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new offer (returns the inserted record with defaults applied)
    pub async fn create(
        id: OfferId,
        name: String,
        description: String,
        price: Decimal,
        details: Vec<DetailRecord>,
        image: Option<MediaAsset>,
        owner_id: UserId,
        pool: &PgPool,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (id, name, description, price, details, image, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(Json(details))
        .bind(image.map(Json))
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Persist the mutable fields of this offer
    pub async fn save(&self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers
            SET name = $2,
                description = $3,
                price = $4,
                details = $5,
                image = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.price)
        .bind(&self.details)
        .bind(&self.image)
        .fetch_one(pool)
        .await
    }

    /// Delete an offer by ID; returns the number of rows removed
    pub async fn delete(id: OfferId, pool: &PgPool) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Record that the offer's media assets are gone but the row remains
    pub async fn mark_media_purged(id: OfferId, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query("UPDATE offers SET media_purged = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Page of name/price projections matching the query specification
    pub async fn search(
        query: &ValidatedOfferQuery,
        pool: &PgPool,
    ) -> sqlx::Result<Vec<OfferSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT name, price FROM offers");
        push_filters(&mut qb, query);

        match query.sort {
            Some(SortKey::PriceAsc) => {
                qb.push(" ORDER BY price ASC");
            }
            Some(SortKey::PriceDesc) => {
                qb.push(" ORDER BY price DESC");
            }
            None => {}
        }

        qb.push(" LIMIT ")
            .push_bind(query.page.limit)
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        qb.build_query_as::<OfferSummary>().fetch_all(pool).await
    }

    /// Total matches for the query, ignoring the pagination window
    pub async fn count(query: &ValidatedOfferQuery, pool: &PgPool) -> sqlx::Result<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM offers");
        push_filters(&mut qb, query);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }
}

/// Append the WHERE clause derived from the query specification.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ValidatedOfferQuery) {
    let mut sep = " WHERE ";

    if let Some(title) = &query.title {
        qb.push(sep)
            .push("name ILIKE ")
            .push_bind(format!("%{}%", escape_like(title)));
        sep = " AND ";
    }
    if let Some(min) = query.price_min {
        qb.push(sep).push("price >= ").push_bind(min);
        sep = " AND ";
    }
    if let Some(max) = query.price_max {
        qb.push(sep).push("price <= ").push_bind(max);
    }
}

/// Escape LIKE wildcards in user input so they match literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
