//! PostgreSQL listing repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ListingRepository, RepositoryError, RepositoryResult};
use crate::features::listings::filter::ListingFilters;
use crate::features::listings::query_builder::{
    count_query, page_query, predicates, LISTING_COLUMNS, LISTING_ORDER,
};
use crate::features::listings::types::{Listing, ListingPage};

#[derive(Debug, Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    #[tracing::instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn insert(&self, listing: &Listing) -> RepositoryResult<Listing> {
        let sql = format!(
            r#"
            INSERT INTO listings (
                id, name, property_name, type, property_type, address, price, rating,
                description, verified, is_active, is_deleted, amenities, images, email,
                phone, google_map_link, slug, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            RETURNING {}
            "#,
            LISTING_COLUMNS
        );

        let record = sqlx::query_as::<_, ListingRecord>(&sql)
            .bind(listing.id)
            .bind(&listing.name)
            .bind(&listing.property_name)
            .bind(listing.listing_type.as_str())
            .bind(listing.property_type.as_str())
            .bind(&listing.address)
            .bind(listing.price)
            .bind(listing.rating)
            .bind(&listing.description)
            .bind(listing.verified)
            .bind(listing.is_active)
            .bind(listing.is_deleted)
            .bind(&listing.amenities)
            .bind(&listing.images)
            .bind(&listing.email)
            .bind(&listing.phone)
            .bind(&listing.google_map_link)
            .bind(&listing.slug)
            .bind(listing.created_at)
            .bind(listing.updated_at)
            .bind(listing.deleted_at)
            .fetch_one(&self.pool)
            .await?;

        record.try_into()
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Listing>> {
        let sql = format!(
            "SELECT {} FROM listings WHERE id = $1 AND is_deleted = FALSE",
            LISTING_COLUMNS
        );

        sqlx::query_as::<_, ListingRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Listing::try_from)
            .transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Listing>> {
        let sql = format!(
            "SELECT {} FROM listings WHERE lower(slug) = lower($1) AND is_deleted = FALSE \
             ORDER BY {} LIMIT 1",
            LISTING_COLUMNS, LISTING_ORDER
        );

        sqlx::query_as::<_, ListingRecord>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .map(Listing::try_from)
            .transpose()
    }

    #[tracing::instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn update(&self, listing: &Listing) -> RepositoryResult<Option<Listing>> {
        let sql = format!(
            r#"
            UPDATE listings
            SET name = $2, property_name = $3, type = $4, property_type = $5, address = $6,
                price = $7, rating = $8, description = $9, verified = $10, is_active = $11,
                amenities = $12, images = $13, email = $14, phone = $15,
                google_map_link = $16, slug = $17, updated_at = $18
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {}
            "#,
            LISTING_COLUMNS
        );

        sqlx::query_as::<_, ListingRecord>(&sql)
            .bind(listing.id)
            .bind(&listing.name)
            .bind(&listing.property_name)
            .bind(listing.listing_type.as_str())
            .bind(listing.property_type.as_str())
            .bind(&listing.address)
            .bind(listing.price)
            .bind(listing.rating)
            .bind(&listing.description)
            .bind(listing.verified)
            .bind(listing.is_active)
            .bind(&listing.amenities)
            .bind(&listing.images)
            .bind(&listing.email)
            .bind(&listing.phone)
            .bind(&listing.google_map_link)
            .bind(&listing.slug)
            .bind(listing.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .map(Listing::try_from)
            .transpose()
    }

    #[tracing::instrument(skip(self, filters), fields(limit = filters.limit, offset = filters.offset))]
    async fn search(&self, filters: &ListingFilters) -> RepositoryResult<ListingPage> {
        let predicates = predicates(filters);

        let total = count_query(&predicates)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let records = page_query(&predicates, filters.limit, filters.offset)
            .build_query_as::<ListingRecord>()
            .fetch_all(&self.pool)
            .await?;

        let items = records
            .into_iter()
            .map(Listing::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(ListingPage { items, total })
    }

    async fn ping(&self) -> RepositoryResult<()> {
        crate::db::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Row shape as stored; enums are TEXT columns guarded by CHECK constraints.
#[derive(Debug, sqlx::FromRow)]
struct ListingRecord {
    id: Uuid,
    name: String,
    property_name: String,
    #[sqlx(rename = "type")]
    listing_type: String,
    property_type: String,
    address: String,
    price: f64,
    rating: Option<f64>,
    description: Option<String>,
    verified: bool,
    is_active: bool,
    is_deleted: bool,
    amenities: Vec<String>,
    images: Vec<String>,
    email: Option<String>,
    phone: Option<String>,
    google_map_link: Option<String>,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ListingRecord> for Listing {
    type Error = RepositoryError;

    fn try_from(record: ListingRecord) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| RepositoryError::Corrupt {
            id: record.id,
            reason,
        };

        Ok(Listing {
            listing_type: record.listing_type.parse().map_err(corrupt)?,
            property_type: record.property_type.parse().map_err(corrupt)?,
            id: record.id,
            name: record.name,
            property_name: record.property_name,
            address: record.address,
            price: record.price,
            rating: record.rating,
            description: record.description,
            verified: record.verified,
            is_active: record.is_active,
            is_deleted: record.is_deleted,
            amenities: record.amenities,
            images: record.images,
            email: record.email,
            phone: record.phone,
            google_map_link: record.google_map_link,
            slug: record.slug,
            created_at: record.created_at,
            updated_at: record.updated_at,
            deleted_at: record.deleted_at,
        })
    }
}

impl From<crate::db::DbError> for RepositoryError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::Sqlx(e) => RepositoryError::Database(e),
            crate::db::DbError::Migrate(e) => RepositoryError::Database(e.into()),
        }
    }
}
