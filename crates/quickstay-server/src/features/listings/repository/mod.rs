//! Listing persistence
//!
//! Handlers only see [`ListingRepository`]. The PostgreSQL implementation is
//! used in production; the in-memory one backs tests and `QUICKSTAY_BACKEND=memory`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::filter::ListingFilters;
use super::types::{Listing, ListingPage};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryListingRepository;
pub use postgres::PgListingRepository;

/// Repository failures
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into a listing
    #[error("Corrupt listing row {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for listings. Soft-deleted rows are invisible to every method.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Store a new listing and return it as persisted.
    async fn insert(&self, listing: &Listing) -> RepositoryResult<Listing>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Listing>>;

    /// Case-insensitive; the newest match wins when slugs collide.
    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Listing>>;

    /// Overwrite every mutable column. `None` when the listing no longer exists.
    async fn update(&self, listing: &Listing) -> RepositoryResult<Option<Listing>>;

    async fn search(&self, filters: &ListingFilters) -> RepositoryResult<ListingPage>;

    /// Connectivity probe for `/health`
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Shared handle stored in router state
pub type SharedListingRepository = Arc<dyn ListingRepository>;
