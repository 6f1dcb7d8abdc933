//! Process-local listing repository

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ListingRepository, RepositoryResult};
use crate::features::listings::filter::ListingFilters;
use crate::features::listings::query_builder::{evaluate, newest_first};
use crate::features::listings::types::{Listing, ListingPage};

#[derive(Debug, Default)]
pub struct InMemoryListingRepository {
    listings: RwLock<HashMap<Uuid, Listing>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, soft-deleted included
    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listings.read().await.is_empty()
    }

    /// Mark a listing deleted without removing it.
    pub async fn soft_delete(&self, id: Uuid) -> bool {
        let mut listings = self.listings.write().await;
        match listings.get_mut(&id) {
            Some(listing) if !listing.is_deleted => {
                let now = chrono::Utc::now();
                listing.is_deleted = true;
                listing.deleted_at = Some(now);
                listing.updated_at = now;
                true
            },
            _ => false,
        }
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> RepositoryResult<Listing> {
        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());
        Ok(listing.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Listing>> {
        Ok(self
            .listings
            .read()
            .await
            .get(&id)
            .filter(|listing| !listing.is_deleted)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Listing>> {
        let slug = slug.to_lowercase();
        Ok(self
            .listings
            .read()
            .await
            .values()
            .filter(|listing| !listing.is_deleted && listing.slug.to_lowercase() == slug)
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }

    async fn update(&self, listing: &Listing) -> RepositoryResult<Option<Listing>> {
        let mut listings = self.listings.write().await;
        match listings.get_mut(&listing.id) {
            Some(stored) if !stored.is_deleted => {
                *stored = listing.clone();
                Ok(Some(listing.clone()))
            },
            _ => Ok(None),
        }
    }

    async fn search(&self, filters: &ListingFilters) -> RepositoryResult<ListingPage> {
        let listings = self.listings.read().await;
        let (items, total) = evaluate(listings.values(), filters);
        Ok(ListingPage { items, total })
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
